//! Gateway file rendering.
//!
//! Turns a planned gateway artifact into Go source exposing, per service,
//! the four registration entry points. Only bound methods are registered;
//! request decoding and path-template matching are left to the runtime.

use gwgen_descriptor::{Binding, MessageRef, Method, PackageIdentity, Service};

use crate::{
    builder::CodeFragment,
    generation::GoImports,
    go_file::GoFile,
    go_func::GoFunc,
    plan::{ArtifactKind, PlannedArtifact},
    symbols::RegistrationStyle,
};

const RUNTIME: &str = "github.com/grpc-ecosystem/grpc-gateway/v2/runtime";
const GRPC: &str = "google.golang.org/grpc";
const GRPCLOG: &str = "google.golang.org/grpc/grpclog";
const CODES: &str = "google.golang.org/grpc/codes";
const STATUS: &str = "google.golang.org/grpc/status";
const PROTO: &str = "google.golang.org/protobuf/proto";

const HANDLER_PARAMS: &str = "w http.ResponseWriter, req *http.Request, pathParams map[string]string";

/// Renders the gateway artifact of a plan.
#[derive(Debug)]
pub struct GatewayFile<'a> {
    artifact: &'a PlannedArtifact,
    register_func_suffix: &'a str,
    omit_package_doc: bool,
}

impl<'a> GatewayFile<'a> {
    /// Returns `None` for alias shims.
    pub fn new(artifact: &'a PlannedArtifact, register_func_suffix: &'a str) -> Option<Self> {
        match artifact.kind {
            ArtifactKind::Gateway => Some(Self::for_gateway(artifact, register_func_suffix)),
            ArtifactKind::AliasShim { .. } => None,
        }
    }

    /// Caller has already matched `artifact.kind` as [`ArtifactKind::Gateway`].
    pub(crate) fn for_gateway(artifact: &'a PlannedArtifact, register_func_suffix: &'a str) -> Self {
        Self {
            artifact,
            register_func_suffix,
            omit_package_doc: false,
        }
    }

    /// Skip the package documentation block.
    pub fn omit_package_doc(mut self, omit: bool) -> Self {
        self.omit_package_doc = omit;
        self
    }

    /// Package hosting a service's stub types, when references must be qualified.
    ///
    /// A package never qualifies its own symbols, even with
    /// `force_prefixed_name` set, since Go rejects a file importing its own package.
    fn stub_package(&self, svc: &'a Service) -> Option<&'a PackageIdentity> {
        let stub = svc.stub_package(&self.artifact.origin);
        (!stub.same_package(&self.artifact.package)).then_some(stub)
    }

    /// Package declaring a message, when it is not the artifact's own.
    fn message_package(&self, msg: &'a MessageRef) -> Option<&'a PackageIdentity> {
        let pkg = msg.package.as_ref().unwrap_or(&self.artifact.origin);
        (!pkg.same_package(&self.artifact.package)).then_some(pkg)
    }

    fn bound_methods(&self) -> impl Iterator<Item = &'a Method> {
        self.artifact.services.iter().flat_map(Service::bound_methods)
    }

    /// Imports referenced by the rendered code.
    pub fn imports(&self) -> GoImports {
        let mut imports = GoImports::new();
        for path in ["context", "net/http", RUNTIME, GRPC, GRPCLOG] {
            imports.add(path);
        }

        if self.bound_methods().any(Method::is_streaming) {
            imports.add(CODES);
            imports.add(STATUS);
        }
        if self
            .bound_methods()
            .any(|m| m.server_streaming && !m.client_streaming)
        {
            imports.add(PROTO);
        }

        let companions = || {
            self.artifact
                .services
                .iter()
                .filter_map(|svc| svc.companion.as_ref())
        };
        for path in &self.artifact.companion_imports {
            if let Some(companion) = companions().find(|c| &c.path == path) {
                imports.add_aliased(path, companion.reference_name());
            }
        }

        for svc in &self.artifact.services {
            if let Some(pkg) = self.stub_package(svc) {
                imports.add_aliased(&pkg.path, pkg.reference_name());
            }
        }
        for method in self.bound_methods() {
            for msg in [&method.input, &method.output] {
                if let Some(pkg) = self.message_package(msg) {
                    imports.add_aliased(&pkg.path, pkg.reference_name());
                }
            }
        }

        imports
    }

    pub fn render(&self) -> String {
        let package = &self.artifact.package.name;
        let doc = if self.omit_package_doc {
            Vec::new()
        } else {
            vec![
                format!("Package {package} is a reverse proxy."),
                String::new(),
                "It translates gRPC into RESTful JSON APIs.".to_string(),
            ]
        };

        let functions = self
            .artifact
            .services
            .iter()
            .flat_map(|svc| self.service_functions(svc));

        GoFile::new(&self.artifact.source, package)
            .doc(doc)
            .imports(self.imports())
            .add_all(functions)
            .render()
    }

    fn service_functions(&self, svc: &'a Service) -> [GoFunc; 4] {
        [
            self.server_func(svc),
            self.client_func(svc),
            self.from_endpoint_func(svc),
            self.generic_func(svc),
        ]
    }

    fn symbol(&self, style: RegistrationStyle, svc: &Service) -> String {
        style.symbol(&svc.name, self.register_func_suffix)
    }

    fn stub_type(&self, svc: &'a Service, ty: &str) -> String {
        qualify(self.stub_package(svc), ty)
    }

    fn message_type(&self, msg: &'a MessageRef) -> String {
        qualify(self.message_package(msg), &msg.name)
    }

    fn server_func(&self, svc: &'a Service) -> GoFunc {
        let name = self.symbol(RegistrationStyle::Server, svc);
        let server = self.stub_type(svc, &format!("{}Server", svc.name));

        let mut func = GoFunc::new(&name)
            .doc(format!(
                "{name} registers the http handlers for service {} to \"mux\".",
                svc.name
            ))
            .doc("Streaming methods are not supported in-process and answer Unimplemented.")
            .param("ctx", "context.Context")
            .param("mux", "*runtime.ServeMux")
            .param("server", server)
            .returns("error");

        for method in svc.bound_methods() {
            let handler = if method.is_streaming() {
                unimplemented_handler()
            } else {
                self.unary_handler(method, "server")
            };
            for binding in &method.bindings {
                func = func.body(handle_path(binding, handler.clone()));
            }
        }
        func.body_line("return nil")
    }

    fn client_func(&self, svc: &'a Service) -> GoFunc {
        let name = self.symbol(RegistrationStyle::Client, svc);
        let client = self.stub_type(svc, &format!("{}Client", svc.name));

        let mut func = GoFunc::new(&name)
            .doc(format!(
                "{name} registers the http handlers for service {} to \"mux\".",
                svc.name
            ))
            .doc(format!(
                "The handlers forward requests to the grpc endpoint over \"client\" ({client})."
            ))
            .param("ctx", "context.Context")
            .param("mux", "*runtime.ServeMux")
            .param("client", client)
            .returns("error");

        for method in svc.bound_methods() {
            let handler = if method.client_streaming {
                unimplemented_handler()
            } else if method.server_streaming {
                self.server_stream_handler(method)
            } else {
                self.unary_handler(method, "client")
            };
            for binding in &method.bindings {
                func = func.body(handle_path(binding, handler.clone()));
            }
        }
        func.body_line("return nil")
    }

    fn from_endpoint_func(&self, svc: &Service) -> GoFunc {
        let name = self.symbol(RegistrationStyle::FromEndpoint, svc);
        let generic = self.symbol(RegistrationStyle::Generic, svc);
        let close = || {
            CodeFragment::block(
                "if cerr := conn.Close(); cerr != nil {",
                vec![CodeFragment::line(
                    "grpclog.Errorf(\"Failed to close conn to %s: %v\", endpoint, cerr)",
                )],
                "}",
            )
        };

        GoFunc::new(&name)
            .doc(format!(
                "{name} is same as {generic} but automatically dials to \"endpoint\" and closes the connection when \"ctx\" gets done."
            ))
            .param("ctx", "context.Context")
            .param("mux", "*runtime.ServeMux")
            .param("endpoint", "string")
            .param("opts", "[]grpc.DialOption")
            .returns("(err error)")
            .body_line("conn, err := grpc.NewClient(endpoint, opts...)")
            .body(return_on_error("return err"))
            .body(CodeFragment::block(
                "defer func() {",
                vec![
                    CodeFragment::block(
                        "if err != nil {",
                        vec![close(), CodeFragment::line("return")],
                        "}",
                    ),
                    CodeFragment::block(
                        "go func() {",
                        vec![CodeFragment::line("<-ctx.Done()"), close()],
                        "}()",
                    ),
                ],
                "}()",
            ))
            .body_line(format!("return {generic}(ctx, mux, conn)"))
    }

    fn generic_func(&self, svc: &'a Service) -> GoFunc {
        let name = self.symbol(RegistrationStyle::Generic, svc);
        let client = self.symbol(RegistrationStyle::Client, svc);
        let constructor = self.stub_type(svc, &format!("New{}Client", svc.name));

        GoFunc::new(&name)
            .doc(format!(
                "{name} registers the http handlers for service {} to \"mux\".",
                svc.name
            ))
            .doc("The handlers forward requests to the grpc endpoint over \"conn\".")
            .param("ctx", "context.Context")
            .param("mux", "*runtime.ServeMux")
            .param("conn", "*grpc.ClientConn")
            .returns("error")
            .body_line(format!("return {client}(ctx, mux, {constructor}(conn))"))
    }

    fn unary_handler(&self, method: &'a Method, receiver: &str) -> Vec<CodeFragment> {
        vec![
            CodeFragment::line("_, outboundMarshaler := runtime.MarshalerForRequest(mux, req)"),
            CodeFragment::line(format!(
                "var protoReq {}",
                self.message_type(&method.input)
            )),
            CodeFragment::line(format!(
                "resp, err := {receiver}.{}(req.Context(), &protoReq)",
                method.name
            )),
            forward_error(),
            CodeFragment::line(
                "runtime.ForwardResponseMessage(req.Context(), mux, outboundMarshaler, w, req, resp)",
            ),
        ]
    }

    fn server_stream_handler(&self, method: &'a Method) -> Vec<CodeFragment> {
        vec![
            CodeFragment::line("_, outboundMarshaler := runtime.MarshalerForRequest(mux, req)"),
            CodeFragment::line(format!(
                "var protoReq {}",
                self.message_type(&method.input)
            )),
            CodeFragment::line(format!(
                "stream, err := client.{}(req.Context(), &protoReq)",
                method.name
            )),
            forward_error(),
            CodeFragment::line(
                "runtime.ForwardResponseStream(req.Context(), mux, outboundMarshaler, w, req, func() (proto.Message, error) { return stream.Recv() })",
            ),
        ]
    }
}

fn qualify(package: Option<&PackageIdentity>, name: &str) -> String {
    match package {
        Some(pkg) => format!("{}.{name}", pkg.reference_name()),
        None => name.to_string(),
    }
}

/// `if err := mux.HandlePath(...); err != nil { return err }` around `handler`.
fn handle_path(binding: &Binding, handler: Vec<CodeFragment>) -> Vec<CodeFragment> {
    vec![
        CodeFragment::block(
            format!(
                "if err := mux.HandlePath({:?}, {:?}, func({HANDLER_PARAMS}) {{",
                binding.http_method, binding.path_template
            ),
            handler,
            "}); err != nil {",
        ),
        CodeFragment::Indent(vec![CodeFragment::line("return err")]),
        CodeFragment::line("}"),
    ]
}

fn unimplemented_handler() -> Vec<CodeFragment> {
    vec![
        CodeFragment::line(
            "err := status.Error(codes.Unimplemented, \"streaming calls are not yet supported in the in-process transport\")",
        ),
        CodeFragment::line("_, outboundMarshaler := runtime.MarshalerForRequest(mux, req)"),
        CodeFragment::line("runtime.HTTPError(req.Context(), mux, outboundMarshaler, w, req, err)"),
    ]
}

fn forward_error() -> CodeFragment {
    CodeFragment::block(
        "if err != nil {",
        vec![
            CodeFragment::line("runtime.HTTPError(req.Context(), mux, outboundMarshaler, w, req, err)"),
            CodeFragment::line("return"),
        ],
        "}",
    )
}

fn return_on_error(ret: &str) -> CodeFragment {
    CodeFragment::block("if err != nil {", vec![CodeFragment::line(ret)], "}")
}
