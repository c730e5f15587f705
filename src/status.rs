//! HTTP status codes as a typed enum, plus the reason-phrase table.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()`,
//! `Response::builder().status()`, or as a bare handler return value.
//!
//! ```rust
//! use snippetbox::{Response, Status};
//!
//! Response::status(Status::NoContent);
//! Response::redirect(Status::SeeOther, "/snippet/view/1");
//!
//! async fn gone(_req: snippetbox::Request) -> Status {
//!     Status::Gone
//! }
//! ```
//!
//! The writer layer works with raw `u16` codes (a handler may write any code
//! in `100..=999`), so [`reason`] accepts a bare number and returns `""` for
//! codes it does not know.

macro_rules! statuses {
    ($($variant:ident = $code:literal => $reason:literal,)+) => {
        /// All IANA-registered HTTP status codes.
        #[allow(clippy::enum_variant_names)]
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum Status {
            $($variant,)+
        }

        impl Status {
            /// Numeric code, e.g. `404`.
            pub fn code(self) -> u16 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        /// Human-readable reason phrase for `code`, or `""` if unregistered.
        pub fn reason(code: u16) -> &'static str {
            match code {
                $($code => $reason,)+
                _ => "",
            }
        }
    };
}

statuses! {
    // ── 1xx Informational ─────────────────────────────────────────────────────
    Continue                      = 100 => "Continue",
    SwitchingProtocols            = 101 => "Switching Protocols",
    Processing                    = 102 => "Processing",
    EarlyHints                    = 103 => "Early Hints",

    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok                            = 200 => "OK",
    Created                       = 201 => "Created",
    Accepted                      = 202 => "Accepted",
    NonAuthoritativeInformation   = 203 => "Non-Authoritative Information",
    NoContent                     = 204 => "No Content",
    ResetContent                  = 205 => "Reset Content",
    PartialContent                = 206 => "Partial Content",
    MultiStatus                   = 207 => "Multi-Status",
    AlreadyReported               = 208 => "Already Reported",
    ImUsed                        = 226 => "IM Used",

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    MultipleChoices               = 300 => "Multiple Choices",
    MovedPermanently              = 301 => "Moved Permanently",
    Found                         = 302 => "Found",
    SeeOther                      = 303 => "See Other",
    NotModified                   = 304 => "Not Modified",
    TemporaryRedirect             = 307 => "Temporary Redirect",
    PermanentRedirect             = 308 => "Permanent Redirect",

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest                    = 400 => "Bad Request",
    Unauthorized                  = 401 => "Unauthorized",
    PaymentRequired               = 402 => "Payment Required",
    Forbidden                     = 403 => "Forbidden",
    NotFound                      = 404 => "Not Found",
    MethodNotAllowed              = 405 => "Method Not Allowed",
    NotAcceptable                 = 406 => "Not Acceptable",
    ProxyAuthenticationRequired   = 407 => "Proxy Authentication Required",
    RequestTimeout                = 408 => "Request Timeout",
    Conflict                      = 409 => "Conflict",
    Gone                          = 410 => "Gone",
    LengthRequired                = 411 => "Length Required",
    PreconditionFailed            = 412 => "Precondition Failed",
    ContentTooLarge               = 413 => "Request Entity Too Large",
    UriTooLong                    = 414 => "Request URI Too Long",
    UnsupportedMediaType          = 415 => "Unsupported Media Type",
    RangeNotSatisfiable           = 416 => "Requested Range Not Satisfiable",
    ExpectationFailed             = 417 => "Expectation Failed",
    ImATeapot                     = 418 => "I'm a teapot",
    MisdirectedRequest            = 421 => "Misdirected Request",
    UnprocessableContent          = 422 => "Unprocessable Entity",
    Locked                        = 423 => "Locked",
    FailedDependency              = 424 => "Failed Dependency",
    TooEarly                      = 425 => "Too Early",
    UpgradeRequired               = 426 => "Upgrade Required",
    PreconditionRequired          = 428 => "Precondition Required",
    TooManyRequests               = 429 => "Too Many Requests",
    RequestHeaderFieldsTooLarge   = 431 => "Request Header Fields Too Large",
    UnavailableForLegalReasons    = 451 => "Unavailable For Legal Reasons",

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError           = 500 => "Internal Server Error",
    NotImplemented                = 501 => "Not Implemented",
    BadGateway                    = 502 => "Bad Gateway",
    ServiceUnavailable            = 503 => "Service Unavailable",
    GatewayTimeout                = 504 => "Gateway Timeout",
    HttpVersionNotSupported       = 505 => "HTTP Version Not Supported",
    VariantAlsoNegotiates         = 506 => "Variant Also Negotiates",
    InsufficientStorage           = 507 => "Insufficient Storage",
    LoopDetected                  = 508 => "Loop Detected",
    NotExtended                   = 510 => "Not Extended",
    NetworkAuthenticationRequired = 511 => "Network Authentication Required",
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_matches_code() {
        assert_eq!(reason(Status::Ok.code()), "OK");
        assert_eq!(reason(500), "Internal Server Error");
        assert_eq!(reason(422), "Unprocessable Entity");
    }

    #[test]
    fn unknown_code_has_empty_reason() {
        assert_eq!(reason(299), "");
        assert_eq!(reason(999), "");
    }
}
