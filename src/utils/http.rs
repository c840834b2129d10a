use reqwest::RequestBuilder;

/// Header OctoPrint reads the API key from
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Add the OctoPrint API key header to a request
pub fn with_api_key(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request.header(API_KEY_HEADER, api_key)
}
