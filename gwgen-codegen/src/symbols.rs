//! Names of the generated registration entry points.

/// The ways a service's handlers can be registered on a mux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStyle {
    /// Calls the server implementation in-process.
    Server,
    /// Calls through an RPC client.
    Client,
    /// Dials an endpoint, then registers through a client.
    FromEndpoint,
    /// Registers through an existing connection.
    Generic,
}

impl RegistrationStyle {
    /// Every style, in the order the entry points are emitted.
    pub const ALL: [RegistrationStyle; 4] = [
        RegistrationStyle::Server,
        RegistrationStyle::Client,
        RegistrationStyle::FromEndpoint,
        RegistrationStyle::Generic,
    ];

    fn tail(self) -> &'static str {
        match self {
            RegistrationStyle::Server => "Server",
            RegistrationStyle::Client => "Client",
            RegistrationStyle::FromEndpoint => "FromEndpoint",
            RegistrationStyle::Generic => "",
        }
    }

    /// `Register<Service><suffix><tail>`, e.g. `RegisterEchoHandlerClient`.
    pub fn symbol(self, service: &str, suffix: &str) -> String {
        format!("Register{service}{suffix}{}", self.tail())
    }
}

/// All registration symbols of a service, in emission order.
pub fn registration_symbols(service: &str, suffix: &str) -> Vec<String> {
    RegistrationStyle::ALL
        .iter()
        .map(|style| style.symbol(service, suffix))
        .collect()
}
