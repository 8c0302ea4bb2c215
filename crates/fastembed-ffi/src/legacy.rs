// crates/fastembed-ffi/src/legacy.rs
//
// Unprefixed C symbols from the first release of the library. Each one
// forwards to its `fastembed_*` counterpart and behaves identically.

use std::os::raw::{c_char, c_int};

use crate::{
    fastembed_add_vectors, fastembed_cosine_similarity, fastembed_dot_product,
    fastembed_generate, fastembed_normalize, fastembed_vector_norm,
};

/// # Safety
///
/// As for [`fastembed_generate`].
#[deprecated(note = "use fastembed_generate")]
#[no_mangle]
pub unsafe extern "C" fn generate_embedding(
    text: *const c_char,
    output: *mut f32,
    dimension: c_int,
) -> c_int {
    fastembed_generate(text, output, dimension)
}

/// # Safety
///
/// As for [`fastembed_dot_product`].
#[deprecated(note = "use fastembed_dot_product")]
#[no_mangle]
pub unsafe extern "C" fn dot_product(vec1: *const f32, vec2: *const f32, dimension: c_int) -> f32 {
    fastembed_dot_product(vec1, vec2, dimension)
}

/// # Safety
///
/// As for [`fastembed_cosine_similarity`].
#[deprecated(note = "use fastembed_cosine_similarity")]
#[no_mangle]
pub unsafe extern "C" fn cosine_similarity(
    vec1: *const f32,
    vec2: *const f32,
    dimension: c_int,
) -> f32 {
    fastembed_cosine_similarity(vec1, vec2, dimension)
}

/// # Safety
///
/// As for [`fastembed_vector_norm`].
#[deprecated(note = "use fastembed_vector_norm")]
#[no_mangle]
pub unsafe extern "C" fn vector_norm(vec: *const f32, dimension: c_int) -> f32 {
    fastembed_vector_norm(vec, dimension)
}

/// # Safety
///
/// As for [`fastembed_normalize`].
#[deprecated(note = "use fastembed_normalize")]
#[no_mangle]
pub unsafe extern "C" fn normalize_vector(vec: *mut f32, dimension: c_int) {
    fastembed_normalize(vec, dimension)
}

/// # Safety
///
/// As for [`fastembed_add_vectors`].
#[deprecated(note = "use fastembed_add_vectors")]
#[no_mangle]
pub unsafe extern "C" fn add_vectors(
    vec1: *const f32,
    vec2: *const f32,
    result: *mut f32,
    dimension: c_int,
) {
    fastembed_add_vectors(vec1, vec2, result, dimension)
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_generate_embedding_forwards() {
        let text = CString::new("legacy").unwrap();
        let mut old = vec![0.0f32; 256];
        let mut new = vec![1.0f32; 256];
        unsafe {
            assert_eq!(generate_embedding(text.as_ptr(), old.as_mut_ptr(), 256), 0);
            assert_eq!(fastembed_generate(text.as_ptr(), new.as_mut_ptr(), 256), 0);
        }
        assert_eq!(old, new);
    }

    #[test]
    fn test_vector_aliases_forward() {
        let a = [1.0f32, 2.0, 3.0];
        let b = [4.0f32, 5.0, 6.0];
        unsafe {
            assert_eq!(dot_product(a.as_ptr(), b.as_ptr(), 3), 32.0);
            assert_eq!(vector_norm([3.0f32, 4.0, 0.0].as_ptr(), 3), 5.0);
            assert_eq!(cosine_similarity([1.0f32, 0.0].as_ptr(), [-1.0f32, 0.0].as_ptr(), 2), -1.0);

            let mut sum = [0.0f32; 3];
            add_vectors(a.as_ptr(), b.as_ptr(), sum.as_mut_ptr(), 3);
            assert_eq!(sum, [5.0, 7.0, 9.0]);

            let mut v = [3.0f32, 4.0, 0.0];
            normalize_vector(v.as_mut_ptr(), 3);
            assert!((v[0] - 0.6).abs() < 1e-6);
        }
    }
}
