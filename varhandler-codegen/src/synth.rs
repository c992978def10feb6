//! Handler synthesis.
//!
//! Renders one [`FunctionDescriptor`] into the source of its handler, and
//! provides the fixed text every generated file carries.

use crate::{
    builder::CodeBuilder,
    descriptor::FunctionDescriptor,
    naming::NamingConvention,
};

/// First characters of every generated file.
pub const BANNER_PREFIX: &str = "// Code generated by \"varhandler";

/// Crate-level lints the generated names and imports would otherwise trip.
pub const FILE_ATTRIBUTES: &str =
    "#![allow(non_snake_case, unused_imports, clippy::needless_return)]";

/// Import every generated file needs.
pub const FIXED_IMPORT: &str = "use http::{header, HeaderValue, Request, Response, StatusCode};";

/// Name of the error dispatcher emitted in [`UTILITY_ROUTINES`].
pub const ERROR_DISPATCHER: &str = "HandleHttpErrorWithDefaultStatus";

/// Name of the response dispatcher emitted in [`UTILITY_ROUTINES`].
pub const RESPONSE_DISPATCHER: &str = "HandleHttpResponse";

/// The generated-file banner for a run invoked with `invocation`.
pub fn banner(invocation: &str) -> String {
    let invocation = invocation.trim();
    if invocation.is_empty() {
        format!("{}\"; DO NOT EDIT.", BANNER_PREFIX)
    } else {
        format!("{} {}\"; DO NOT EDIT.", BANNER_PREFIX, invocation)
    }
}

/// Fixed-shape template producing one handler per descriptor.
#[derive(Debug, Clone, Copy)]
pub struct HandlerTemplate {
    naming: NamingConvention,
}

impl HandlerTemplate {
    pub fn new(naming: NamingConvention) -> Self {
        Self { naming }
    }

    /// Render the handler routine for `fd`.
    pub fn render(&self, fd: &FunctionDescriptor) -> String {
        let naming = self.naming;
        let header = format!(
            "pub fn {}(w: &mut Response<Vec<u8>>, r: &Request<Vec<u8>>) {{",
            naming.handler_name(&fd.name)
        );
        let args = (0..fd.parameters.len())
            .map(|i| naming.binding(i))
            .collect::<Vec<_>>()
            .join(", ");
        let call = format!("{}({})", fd.name, args);

        CodeBuilder::rust()
            .block_with_close(&header, "}", |b| {
                b.each(fd.parameters.iter().enumerate(), |b, (i, param)| {
                    b.line(&format!(
                        "let {} = match {}(r) {{",
                        naming.binding(i),
                        param.extractor_path()
                    ))
                    .indent()
                    .line("Ok(value) => value,")
                    .block_with_close("Err(err) => {", "}", |b| {
                        dispatch_error(b, "BAD_REQUEST")
                    })
                    .dedent()
                    .line("};")
                })
                .when(
                    fd.returns_response || fd.returns_status,
                    |b| {
                        b.line(&format!("let {} = match {} {{", outputs(fd), call))
                            .indent()
                            .line("Ok(out) => out,")
                            .block_with_close("Err(err) => {", "}", |b| {
                                dispatch_error(b, "INTERNAL_SERVER_ERROR")
                            })
                            .dedent()
                            .line("};")
                    },
                )
                .when(!fd.returns_response && !fd.returns_status, |b| {
                    b.block_with_close(&format!("if let Err(err) = {} {{", call), "}", |b| {
                        dispatch_error(b, "INTERNAL_SERVER_ERROR")
                    })
                })
                .when(fd.returns_status, |b| {
                    b.block_with_close("if status != 0 {", "}", |b| {
                        b.block_with_close(
                            "if let Ok(code) = StatusCode::from_u16(status) {",
                            "}",
                            |b| b.line("*w.status_mut() = code;"),
                        )
                    })
                })
                .when(fd.returns_response, |b| {
                    b.block_with_close("if !resp.is_empty_response() {", "}", |b| {
                        b.line(&format!("{}(w, r, &resp);", RESPONSE_DISPATCHER))
                    })
                })
            })
            .build()
    }
}

/// Binding pattern for the target's `Ok` value.
fn outputs(fd: &FunctionDescriptor) -> &'static str {
    match (fd.returns_response, fd.returns_status) {
        (true, true) => "(resp, status)",
        (true, false) => "resp",
        (false, true) => "status",
        (false, false) => "()",
    }
}

fn dispatch_error(b: CodeBuilder, status: &str) -> CodeBuilder {
    b.line(&format!(
        "{}(w, r, StatusCode::{}, &err);",
        ERROR_DISPATCHER, status
    ))
    .line("return;")
}

/// Capability traits and dispatchers appended once to every generated file.
///
/// Error precedence: `http_error` > `serve_http` > default status.
/// Response precedence: `serve_http` > `bytes` > `string` > `raw_bytes` > nothing.
pub const UTILITY_ROUTINES: &str = r#"
/// Capabilities an error can expose to shape the response written for it.
pub trait HttpError {
    /// A message and status code describing the error.
    fn http_error(&self) -> Option<(String, u16)> {
        None
    }

    /// Write the whole error response; returns `true` when it did.
    fn serve_http(&self, _w: &mut Response<Vec<u8>>, _r: &Request<Vec<u8>>) -> bool {
        false
    }
}

impl<T: HttpError + ?Sized> HttpError for Box<T> {
    fn http_error(&self) -> Option<(String, u16)> {
        (**self).http_error()
    }

    fn serve_http(&self, w: &mut Response<Vec<u8>>, r: &Request<Vec<u8>>) -> bool {
        (**self).serve_http(w, r)
    }
}

/// Capabilities a response value can expose to be written out.
pub trait HttpResponse {
    /// There is nothing to write.
    fn is_empty_response(&self) -> bool {
        false
    }

    /// Write the whole response; returns `true` when it did.
    fn serve_http(&self, _w: &mut Response<Vec<u8>>, _r: &Request<Vec<u8>>) -> bool {
        false
    }

    /// Encoded body.
    fn bytes(&self) -> Option<Vec<u8>> {
        None
    }

    /// Textual body.
    fn string(&self) -> Option<String> {
        None
    }

    /// Body as raw bytes.
    fn raw_bytes(&self) -> Option<&[u8]> {
        None
    }
}

impl HttpResponse for str {
    fn string(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl HttpResponse for String {
    fn string(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl HttpResponse for Vec<u8> {
    fn raw_bytes(&self) -> Option<&[u8]> {
        Some(self.as_slice())
    }
}

impl<T: HttpResponse + ?Sized> HttpResponse for &T {
    fn is_empty_response(&self) -> bool {
        (**self).is_empty_response()
    }

    fn serve_http(&self, w: &mut Response<Vec<u8>>, r: &Request<Vec<u8>>) -> bool {
        (**self).serve_http(w, r)
    }

    fn bytes(&self) -> Option<Vec<u8>> {
        (**self).bytes()
    }

    fn string(&self) -> Option<String> {
        (**self).string()
    }

    fn raw_bytes(&self) -> Option<&[u8]> {
        (**self).raw_bytes()
    }
}

impl<T: HttpResponse + ?Sized> HttpResponse for Box<T> {
    fn is_empty_response(&self) -> bool {
        (**self).is_empty_response()
    }

    fn serve_http(&self, w: &mut Response<Vec<u8>>, r: &Request<Vec<u8>>) -> bool {
        (**self).serve_http(w, r)
    }

    fn bytes(&self) -> Option<Vec<u8>> {
        (**self).bytes()
    }

    fn string(&self) -> Option<String> {
        (**self).string()
    }

    fn raw_bytes(&self) -> Option<&[u8]> {
        (**self).raw_bytes()
    }
}

impl<T: HttpResponse> HttpResponse for Option<T> {
    fn is_empty_response(&self) -> bool {
        match self {
            Some(inner) => inner.is_empty_response(),
            None => true,
        }
    }

    fn serve_http(&self, w: &mut Response<Vec<u8>>, r: &Request<Vec<u8>>) -> bool {
        match self {
            Some(inner) => inner.serve_http(w, r),
            None => false,
        }
    }

    fn bytes(&self) -> Option<Vec<u8>> {
        self.as_ref().and_then(|inner| inner.bytes())
    }

    fn string(&self) -> Option<String> {
        self.as_ref().and_then(|inner| inner.string())
    }

    fn raw_bytes(&self) -> Option<&[u8]> {
        self.as_ref().and_then(|inner| inner.raw_bytes())
    }
}

/// Write the response for `err`, using `status` when it describes nothing itself.
pub fn HandleHttpErrorWithDefaultStatus<E: HttpError + ?Sized>(
    w: &mut Response<Vec<u8>>,
    r: &Request<Vec<u8>>,
    status: StatusCode,
    err: &E,
) {
    if let Some((message, code)) = err.http_error() {
        *w.status_mut() = StatusCode::from_u16(code).unwrap_or(status);
        let content_type = HeaderValue::from_static("text/plain; charset=utf-8");
        w.headers_mut().insert(header::CONTENT_TYPE, content_type);
        let body = w.body_mut();
        body.clear();
        body.extend_from_slice(message.as_bytes());
        body.push(b'\n');
        return;
    }
    if err.serve_http(w, r) {
        return;
    }
    *w.status_mut() = status;
}

/// Write `resp` with the first capability it has; unknown values write nothing.
pub fn HandleHttpResponse<T: HttpResponse + ?Sized>(
    w: &mut Response<Vec<u8>>,
    r: &Request<Vec<u8>>,
    resp: &T,
) {
    if resp.serve_http(w, r) {
        return;
    }
    if let Some(bytes) = resp.bytes() {
        w.body_mut().extend_from_slice(&bytes);
    } else if let Some(text) = resp.string() {
        w.body_mut().extend_from_slice(text.as_bytes());
    } else if let Some(raw) = resp.raw_bytes() {
        w.body_mut().extend_from_slice(raw);
    }
}
"#;
