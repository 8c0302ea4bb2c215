// crates/fastembed-ffi/src/lib.rs
//
// fastembed-ffi: C ABI over fastembed-core for the language bindings.
//
// Status-returning functions return 0 on success and -1 on failure.
// Float-returning vector operations return 0.0 on invalid arguments. Text
// must be NUL-terminated UTF-8; a string that is not valid UTF-8 is
// rejected with -1. Buffers stay owned by the caller and are never retained
// after a call returns.
//
// The unprefixed names of the first C release live in `legacy`.
//
// All calls share one process-wide engine. It has no model runtime unless
// the host installs one with `install_runtime` before the first call, in
// which case the `fastembed_onnx_*` functions use the session cache;
// otherwise they fall back to the hash path.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;
use std::sync::OnceLock;

use fastembed_core::{Dimension, EmbedError, FastEmbed, ModelRuntime};

pub mod legacy;

static ENGINE: OnceLock<FastEmbed> = OnceLock::new();

fn engine() -> &'static FastEmbed {
    ENGINE.get_or_init(FastEmbed::new)
}

/// Attach a model runtime to the shared engine.
///
/// Returns `false` if the engine already exists (any exported function has
/// been called, or a runtime was installed earlier).
pub fn install_runtime(runtime: Box<dyn ModelRuntime>) -> bool {
    ENGINE.set(FastEmbed::with_runtime(runtime)).is_ok()
}

fn status(result: Result<(), EmbedError>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!("fastembed call failed: {}", e);
            -1
        }
    }
}

/// Borrow a C string as UTF-8. `None` for null or invalid UTF-8: the
/// embedding paths take `&str`, and lossy conversion would silently change
/// the hashed bytes.
unsafe fn text_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Borrow `dimension` floats. `None` for null or non-positive dimension.
unsafe fn vector_arg<'a>(ptr: *const f32, dimension: c_int) -> Option<&'a [f32]> {
    if ptr.is_null() || dimension <= 0 {
        return None;
    }
    Some(slice::from_raw_parts(ptr, dimension as usize))
}

/// Generate a hash-based embedding into `output`.
///
/// `dimension` must be 0 (meaning 128) or one of 128, 256, 512, 768, 1024,
/// 2048. Returns 0 on success, -1 on error.
///
/// # Safety
///
/// `text` must be null or a valid NUL-terminated string; non-UTF-8 text
/// returns -1. `output` must be null or point to at least `dimension`
/// writable floats (128 when `dimension` is 0).
#[no_mangle]
pub unsafe extern "C" fn fastembed_generate(
    text: *const c_char,
    output: *mut f32,
    dimension: c_int,
) -> c_int {
    let Some(text) = text_arg(text) else {
        return -1;
    };
    if output.is_null() || dimension < 0 {
        return -1;
    }
    let Ok(dim) = Dimension::resolve(dimension as usize) else {
        return -1;
    };
    let output = slice::from_raw_parts_mut(output, dim.get());
    status(engine().generate_into(text, output, dim.get()))
}

/// Σ vec1[i] * vec2[i], or 0.0 on invalid arguments.
///
/// # Safety
///
/// Both pointers must be null or point to at least `dimension` floats.
#[no_mangle]
pub unsafe extern "C" fn fastembed_dot_product(
    vec1: *const f32,
    vec2: *const f32,
    dimension: c_int,
) -> f32 {
    match (vector_arg(vec1, dimension), vector_arg(vec2, dimension)) {
        (Some(a), Some(b)) => FastEmbed::dot_product(a, b).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Cosine similarity in [-1, 1], or 0.0 on invalid arguments or a zero vector.
///
/// # Safety
///
/// Both pointers must be null or point to at least `dimension` floats.
#[no_mangle]
pub unsafe extern "C" fn fastembed_cosine_similarity(
    vec1: *const f32,
    vec2: *const f32,
    dimension: c_int,
) -> f32 {
    match (vector_arg(vec1, dimension), vector_arg(vec2, dimension)) {
        (Some(a), Some(b)) => FastEmbed::cosine_similarity(a, b).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// L2 norm, or 0.0 on invalid arguments.
///
/// # Safety
///
/// `vec` must be null or point to at least `dimension` floats.
#[no_mangle]
pub unsafe extern "C" fn fastembed_vector_norm(vec: *const f32, dimension: c_int) -> f32 {
    match vector_arg(vec, dimension) {
        Some(v) => FastEmbed::vector_norm(v).unwrap_or(0.0),
        None => 0.0,
    }
}

/// Normalize `vec` in place. Does nothing on invalid arguments or a zero
/// vector.
///
/// # Safety
///
/// `vec` must be null or point to at least `dimension` writable floats.
#[no_mangle]
pub unsafe extern "C" fn fastembed_normalize(vec: *mut f32, dimension: c_int) {
    if vec.is_null() || dimension <= 0 {
        return;
    }
    let v = slice::from_raw_parts_mut(vec, dimension as usize);
    if let Err(e) = FastEmbed::normalize(v) {
        tracing::debug!("fastembed_normalize failed: {}", e);
    }
}

/// result[i] = vec1[i] + vec2[i]. Does nothing on invalid arguments.
///
/// `result` may alias either input.
///
/// # Safety
///
/// All pointers must be null or point to at least `dimension` floats;
/// `result` must be writable.
#[no_mangle]
pub unsafe extern "C" fn fastembed_add_vectors(
    vec1: *const f32,
    vec2: *const f32,
    result: *mut f32,
    dimension: c_int,
) {
    if result.is_null() {
        return;
    }
    let sum = match (vector_arg(vec1, dimension), vector_arg(vec2, dimension)) {
        (Some(a), Some(b)) => FastEmbed::add_vectors(a, b),
        _ => return,
    };
    match sum {
        Ok(sum) => ptr::copy(sum.as_ptr(), result, sum.len()),
        Err(e) => tracing::debug!("fastembed_add_vectors failed: {}", e),
    }
}

/// Generate an embedding with the model at `model_path`.
///
/// Without an installed runtime this is `fastembed_generate`. Returns 0 on
/// success, -1 on error; the message is available from
/// `fastembed_onnx_get_last_error`.
///
/// # Safety
///
/// `model_path` and `text` must be null or valid NUL-terminated strings.
/// `output` must be null or point to at least `dimension` writable floats.
#[no_mangle]
pub unsafe extern "C" fn fastembed_onnx_generate(
    model_path: *const c_char,
    text: *const c_char,
    output: *mut f32,
    dimension: c_int,
) -> c_int {
    let (Some(model_path), Some(text)) = (text_arg(model_path), text_arg(text)) else {
        return -1;
    };
    if output.is_null() || dimension <= 0 {
        return -1;
    }
    let output = slice::from_raw_parts_mut(output, dimension as usize);
    status(engine().generate_model_into(model_path, text, output, dimension as usize))
}

/// Release the cached model session. Returns 0 on success, -1 if the model
/// runtime was never used.
#[no_mangle]
pub extern "C" fn fastembed_onnx_unload() -> c_int {
    status(engine().unload_model())
}

/// Copy the last model-path error message into `buffer` as a NUL-terminated
/// string, truncated to `size - 1` bytes. An empty string means no error.
/// Returns 0 on success, -1 if `buffer` is null or `size` is 0. Without a
/// model runtime the "not available" message is still copied but the
/// return value is -1.
///
/// # Safety
///
/// `buffer` must be null or point to at least `size` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn fastembed_onnx_get_last_error(buffer: *mut c_char, size: usize) -> c_int {
    if buffer.is_null() || size == 0 {
        return -1;
    }
    let message = engine().last_error().unwrap_or_default();
    let bytes = message.as_bytes();
    let len = bytes.len().min(size - 1);
    ptr::copy_nonoverlapping(bytes.as_ptr(), buffer.cast::<u8>(), len);
    *buffer.add(len) = 0;
    if engine().has_model_runtime() {
        0
    } else {
        -1
    }
}

/// Generate embeddings for `num_texts` texts into `outputs[i]`.
///
/// Unlike `fastembed_generate`, `dimension` must be positive: 0 does not
/// select the default. Stops at the first failure and returns -1; outputs
/// written before it stay valid.
///
/// # Safety
///
/// `texts` and `outputs` must be null or point to `num_texts` entries, each
/// valid as for `fastembed_generate`.
#[no_mangle]
pub unsafe extern "C" fn fastembed_batch_generate(
    texts: *const *const c_char,
    num_texts: c_int,
    outputs: *const *mut f32,
    dimension: c_int,
) -> c_int {
    if texts.is_null() || outputs.is_null() || num_texts <= 0 || dimension <= 0 {
        return -1;
    }
    let texts = slice::from_raw_parts(texts, num_texts as usize);
    let outputs = slice::from_raw_parts(outputs, num_texts as usize);
    for (&text, &output) in texts.iter().zip(outputs) {
        if fastembed_generate(text, output, dimension) != 0 {
            return -1;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn generate(text: &str, dimension: c_int) -> Option<Vec<f32>> {
        let text = CString::new(text).unwrap();
        let len = if dimension == 0 { 128 } else { dimension.max(0) as usize };
        let mut out = vec![0.0f32; len];
        let rc = unsafe { fastembed_generate(text.as_ptr(), out.as_mut_ptr(), dimension) };
        (rc == 0).then_some(out)
    }

    #[test]
    fn test_generate_matches_core() {
        let out = generate("Hello world", 768).unwrap();
        assert_eq!(out, FastEmbed::new().generate("Hello world", 768).unwrap());
    }

    #[test]
    fn test_generate_zero_dimension_uses_default() {
        assert_eq!(generate("text", 0).unwrap(), generate("text", 128).unwrap());
    }

    #[test]
    fn test_generate_rejects_bad_arguments() {
        assert!(generate("", 128).is_none());
        assert!(generate("text", 100).is_none());
        assert!(generate("text", -1).is_none());

        let mut out = vec![0.0f32; 128];
        assert_eq!(unsafe { fastembed_generate(ptr::null(), out.as_mut_ptr(), 128) }, -1);
        let text = CString::new("text").unwrap();
        assert_eq!(unsafe { fastembed_generate(text.as_ptr(), ptr::null_mut(), 128) }, -1);
    }

    #[test]
    fn test_vector_ops() {
        let a = [1.0f32, 2.0, 3.0];
        let b = [4.0f32, 5.0, 6.0];
        unsafe {
            assert_eq!(fastembed_dot_product(a.as_ptr(), b.as_ptr(), 3), 32.0);
            assert_eq!(fastembed_vector_norm([3.0f32, 4.0, 0.0].as_ptr(), 3), 5.0);
            assert_eq!(
                fastembed_cosine_similarity([1.0f32, 0.0].as_ptr(), [0.0f32, 1.0].as_ptr(), 2),
                0.0
            );

            let mut sum = [0.0f32; 3];
            fastembed_add_vectors(a.as_ptr(), b.as_ptr(), sum.as_mut_ptr(), 3);
            assert_eq!(sum, [5.0, 7.0, 9.0]);

            let mut v = [3.0f32, 4.0, 0.0];
            fastembed_normalize(v.as_mut_ptr(), 3);
            assert!((v[0] - 0.6).abs() < 1e-6);
            assert!((v[1] - 0.8).abs() < 1e-6);
        }
    }

    #[test]
    fn test_add_vectors_in_place() {
        let mut a = [1.0f32, 2.0];
        let b = [10.0f32, 20.0];
        let p = a.as_mut_ptr();
        unsafe { fastembed_add_vectors(p, b.as_ptr(), p, 2) };
        assert_eq!(a, [11.0, 22.0]);
    }

    #[test]
    fn test_vector_ops_invalid_arguments() {
        let a = [1.0f32, 2.0];
        unsafe {
            assert_eq!(fastembed_dot_product(ptr::null(), a.as_ptr(), 2), 0.0);
            assert_eq!(fastembed_vector_norm(a.as_ptr(), 0), 0.0);
            assert_eq!(fastembed_cosine_similarity(a.as_ptr(), a.as_ptr(), -3), 0.0);
            fastembed_normalize(ptr::null_mut(), 2);
        }
    }

    #[test]
    fn test_onnx_generate_falls_back_to_hash() {
        let model = CString::new("/no/such/model.onnx").unwrap();
        let text = CString::new("fallback").unwrap();
        let mut out = vec![0.0f32; 768];
        let rc = unsafe { fastembed_onnx_generate(model.as_ptr(), text.as_ptr(), out.as_mut_ptr(), 768) };
        assert_eq!(rc, 0);
        assert_eq!(out, generate("fallback", 768).unwrap());

        let rc = unsafe { fastembed_onnx_generate(model.as_ptr(), text.as_ptr(), out.as_mut_ptr(), 0) };
        assert_eq!(rc, -1);
        let rc = unsafe { fastembed_onnx_generate(ptr::null(), text.as_ptr(), out.as_mut_ptr(), 768) };
        assert_eq!(rc, -1);
    }

    #[test]
    fn test_onnx_unload_and_last_error_without_runtime() {
        assert_eq!(fastembed_onnx_unload(), 0);

        let mut buffer = [1 as c_char; 64];
        assert_eq!(unsafe { fastembed_onnx_get_last_error(buffer.as_mut_ptr(), buffer.len()) }, -1);
        let message = unsafe { CStr::from_ptr(buffer.as_ptr()) }.to_str().unwrap();
        assert_eq!(message, "model runtime not available");

        let mut tiny = [1 as c_char; 6];
        assert_eq!(unsafe { fastembed_onnx_get_last_error(tiny.as_mut_ptr(), tiny.len()) }, -1);
        let message = unsafe { CStr::from_ptr(tiny.as_ptr()) }.to_str().unwrap();
        assert_eq!(message, "model");

        assert_eq!(unsafe { fastembed_onnx_get_last_error(ptr::null_mut(), 16) }, -1);
    }

    #[test]
    fn test_batch_generate() {
        let owned: Vec<CString> = ["one", "two", "three"]
            .iter()
            .map(|t| CString::new(*t).unwrap())
            .collect();
        let texts: Vec<*const c_char> = owned.iter().map(|t| t.as_ptr()).collect();
        let mut buffers = vec![vec![0.0f32; 256]; 3];
        let outputs: Vec<*mut f32> = buffers.iter_mut().map(|b| b.as_mut_ptr()).collect();

        let rc = unsafe { fastembed_batch_generate(texts.as_ptr(), 3, outputs.as_ptr(), 256) };
        assert_eq!(rc, 0);
        assert_eq!(buffers[2], generate("three", 256).unwrap());

        let rc = unsafe { fastembed_batch_generate(texts.as_ptr(), 0, outputs.as_ptr(), 256) };
        assert_eq!(rc, -1);
    }

    #[test]
    fn test_batch_requires_positive_dimension() {
        let owned = [CString::new("one").unwrap()];
        let texts = [owned[0].as_ptr()];
        let mut buffer = vec![3.0f32; 128];
        let outputs = [buffer.as_mut_ptr()];

        let rc = unsafe { fastembed_batch_generate(texts.as_ptr(), 1, outputs.as_ptr(), 0) };
        assert_eq!(rc, -1);
        assert!(buffer.iter().all(|&x| x == 3.0));
    }

    #[test]
    fn test_generate_rejects_invalid_utf8() {
        let text = CString::new(vec![b'a', 0xFF, b'b']).unwrap();
        let mut out = vec![0.0f32; 128];
        assert_eq!(unsafe { fastembed_generate(text.as_ptr(), out.as_mut_ptr(), 128) }, -1);
    }

    #[test]
    fn test_batch_stops_at_first_failure() {
        let owned: Vec<CString> = ["ok", "", "never"]
            .iter()
            .map(|t| CString::new(*t).unwrap())
            .collect();
        let texts: Vec<*const c_char> = owned.iter().map(|t| t.as_ptr()).collect();
        let mut buffers = vec![vec![7.0f32; 128]; 3];
        let outputs: Vec<*mut f32> = buffers.iter_mut().map(|b| b.as_mut_ptr()).collect();

        let rc = unsafe { fastembed_batch_generate(texts.as_ptr(), 3, outputs.as_ptr(), 128) };
        assert_eq!(rc, -1);
        assert_eq!(buffers[0], generate("ok", 128).unwrap());
        assert!(buffers[2].iter().all(|&x| x == 7.0));
    }
}
