//! Linked descriptor graph consumed by the planner.
//!
//! The loader hands over fully resolved files; nothing here validates
//! names or resolves cross-file references.
//!
//! `File::proto_package`, `File::dependencies` and `File::messages` are
//! descriptor data carried through unchanged. Planning and rendering never
//! read them: whether a message is local is decided per reference by
//! [`MessageRef::package`].

use serde::{Deserialize, Serialize};

use crate::PackageIdentity;

/// One descriptor file, the unit of generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    /// Descriptor file name (e.g., "example.proto").
    pub name: String,
    /// Protobuf package declared by the file. Pass-through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proto_package: Option<String>,
    /// Descriptor files imported by this one. Pass-through.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Message types declared in this file. Pass-through.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// Go package the generated code for this file belongs to.
    pub package: PackageIdentity,
    /// Output path prefix without extension (e.g., "foo/bar/v1/example").
    pub generated_filename_prefix: String,
    pub services: Vec<Service>,
}

impl File {
    /// Services with at least one HTTP binding, in declaration order.
    pub fn gateway_services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|svc| svc.has_bindings())
    }

    /// Returns true if any method of any service carries a binding.
    pub fn has_bindings(&self) -> bool {
        self.services.iter().any(Service::has_bindings)
    }
}

/// An RPC service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
    /// RPC-stub package this service binds against, once resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companion: Option<PackageIdentity>,
    /// Always qualify RPC-stub symbols, even from within the same package.
    pub force_prefixed_name: bool,
}

impl Service {
    /// Returns true if at least one method is bound to HTTP.
    pub fn has_bindings(&self) -> bool {
        self.methods.iter().any(Method::is_bound)
    }

    /// Methods with at least one HTTP binding.
    pub fn bound_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_bound())
    }

    /// Package hosting this service's client/server interfaces.
    ///
    /// Falls back to `file_package` until a companion has been resolved.
    pub fn stub_package<'a>(&'a self, file_package: &'a PackageIdentity) -> &'a PackageIdentity {
        self.companion.as_ref().unwrap_or(file_package)
    }
}

/// An RPC method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Method {
    pub name: String,
    pub input: MessageRef,
    pub output: MessageRef,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub bindings: Vec<Binding>,
}

impl Method {
    /// Returns true if the method is eligible for gateway generation.
    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Returns true for client, server or bidirectional streaming.
    pub fn is_streaming(&self) -> bool {
        self.client_streaming || self.server_streaming
    }
}

/// An HTTP rule attached to a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binding {
    /// HTTP verb (e.g., "GET").
    pub http_method: String,
    /// Path template (e.g., "/v1/{name=projects/*}").
    pub path_template: String,
    /// Request field mapped from the body, `*` for the whole message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Reference to a message type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRef {
    pub name: String,
    /// Package declaring the message; `None` means the referencing file's package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageIdentity>,
}

impl MessageRef {
    /// A message declared in the referencing file's package.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
        }
    }

    /// A message declared in another package.
    pub fn external(name: impl Into<String>, package: PackageIdentity) -> Self {
        Self {
            name: name.into(),
            package: Some(package),
        }
    }
}
