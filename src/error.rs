pub type Result<T> = core::result::Result<T, Error>;

pub struct Error {
    pub inner: Box<ErrorKind>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            inner: Box::new(kind),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.inner
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

#[cfg(feature = "no-wasm")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::new(ErrorKind::ReqwestError(e))
    }
}

#[cfg(feature = "wasm")]
impl From<gloo_net::Error> for Error {
    fn from(e: gloo_net::Error) -> Error {
        Error::new(ErrorKind::GlooNetError(e))
    }
}

#[cfg(feature = "wasm")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(e: wasm_bindgen::JsValue) -> Error {
        Error::new(ErrorKind::JsError(format!("{e:?}")))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::new(ErrorKind::SerdeJsonError(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::new(ErrorKind::StdIoError(e))
    }
}

pub enum ErrorKind {
    #[cfg(feature = "no-wasm")]
    ReqwestError(reqwest::Error),
    #[cfg(feature = "wasm")]
    GlooNetError(gloo_net::Error),
    #[cfg(feature = "wasm")]
    JsError(String),
    SerdeJsonError(serde_json::Error),
    StdIoError(std::io::Error),
    /// Non-success status with the response body
    HttpStatus(u16, String),
    PopupLoadError(String),
    MicrophoneError(String),
    StorageError(String),
    ParseError(String),
}

impl std::fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "ReqwestError: {e:?}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "GlooNetError: {e:?}"),
            #[cfg(feature = "wasm")]
            ErrorKind::JsError(ref e) => write!(f, "JsError: {e:?}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "SerdeJsonError: {e:?}"),
            ErrorKind::StdIoError(ref e) => write!(f, "StdIoError: {e:?}"),
            ErrorKind::HttpStatus(code, ref body) => write!(f, "HttpStatus: {code} {body:?}"),
            ErrorKind::PopupLoadError(ref e) => write!(f, "PopupLoadError: {e:?}"),
            ErrorKind::MicrophoneError(ref e) => write!(f, "MicrophoneError: {e:?}"),
            ErrorKind::StorageError(ref e) => write!(f, "StorageError: {e:?}"),
            ErrorKind::ParseError(ref e) => write!(f, "ParseError: {e:?}"),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "network error: {e}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "network error: {e}"),
            #[cfg(feature = "wasm")]
            ErrorKind::JsError(ref e) => write!(f, "browser error: {e}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "invalid JSON: {e}"),
            ErrorKind::StdIoError(ref e) => write!(f, "io error: {e}"),
            ErrorKind::HttpStatus(code, _) => write!(f, "request failed with status {code}"),
            ErrorKind::PopupLoadError(ref e) => write!(f, "popup could not be loaded: {e}"),
            ErrorKind::MicrophoneError(ref e) => write!(f, "{e}"),
            ErrorKind::StorageError(ref e) => write!(f, "storage error: {e}"),
            ErrorKind::ParseError(ref e) => write!(f, "{e}"),
        }
    }
}
