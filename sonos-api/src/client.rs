use soap_client::SoapClient;

use crate::{Result, SonosOperation};

/// A client for executing Sonos operations against actual devices
///
/// Stateless apart from the underlying HTTP agent: the target device is
/// named on every call, so one client serves a whole household.
#[derive(Debug, Clone, Default)]
pub struct SonosClient {
    soap_client: SoapClient,
}

impl SonosClient {
    /// Create a client with the default SOAP timeouts
    pub fn new() -> Self {
        Self {
            soap_client: SoapClient::new(),
        }
    }

    /// Create a client around a custom SOAP client (e.g. different timeouts)
    pub fn with_soap_client(soap_client: SoapClient) -> Self {
        Self { soap_client }
    }

    /// Execute a Sonos operation against a device
    ///
    /// Validates the request, sends it to `host:port` and parses the reply.
    pub fn execute<Op: SonosOperation>(
        &self,
        host: &str,
        port: u16,
        request: &Op::Request,
    ) -> Result<Op::Response> {
        Op::validate(request)?;

        let service_info = Op::SERVICE.info();
        let payload = Op::build_payload(request);

        let xml = self.soap_client.call(
            host,
            port,
            service_info.endpoint,
            service_info.service_uri,
            Op::ACTION,
            &payload,
        )?;

        Op::parse_response(&xml)
    }
}
