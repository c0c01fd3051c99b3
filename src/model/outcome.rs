/// Classified result of one like request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { engaged: bool, count: u64 },
    /// An HTML page came back for a 401/403, usually a login redirect
    AuthRequired,
    ServerError { message: String },
    MalformedResponse,
}

