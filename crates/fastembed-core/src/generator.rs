// crates/fastembed-core/src/generator.rs
//
// Hash-based embedding generator.
//
// Every output slot is produced independently: slot `i` is
// `hash_to_float(combined_hash(text, seed = i))`. No slot is derived from
// another and none depends on the requested dimension, so the first 128
// slots of a 768-d embedding equal the 128-d embedding of the same text.
// All validation happens before the first write.

use crate::config::Dimension;
use crate::error::EmbedError;
use crate::hash::combined_hash;
use crate::normalizer::hash_to_float;
use crate::text;

/// Stateless hash-path generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddingGenerator;

impl EmbeddingGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a newly allocated embedding of `dimension` floats
    /// (`0` selects the default dimension).
    pub fn generate(&self, text: &str, dimension: usize) -> Result<Vec<f32>, EmbedError> {
        let dim = Dimension::resolve(dimension)?;
        let mut output = vec![0.0f32; dim.get()];
        self.generate_into(text, &mut output, dimension)?;
        Ok(output)
    }

    /// Write an embedding into the first `dimension` slots of `output`.
    ///
    /// Returns the resolved dimension. On error the buffer contents are
    /// unspecified.
    pub fn generate_into(
        &self,
        text: &str,
        output: &mut [f32],
        dimension: usize,
    ) -> Result<Dimension, EmbedError> {
        let prepared = text::prepare(text)?;
        let dim = Dimension::resolve(dimension)?;
        if output.len() < dim.get() {
            return Err(EmbedError::OutputTooSmall {
                required: dim.get(),
                actual: output.len(),
            });
        }

        for (seed, slot) in output[..dim.get()].iter_mut().enumerate() {
            *slot = hash_to_float(combined_hash(&prepared, seed as u64));
        }
        Ok(dim)
    }

    /// Embed each text in order, stopping at the first failure.
    pub fn generate_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        dimension: usize,
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }
        texts
            .iter()
            .map(|text| self.generate(text.as_ref(), dimension))
            .collect()
    }

    /// Embed `texts[i]` into `outputs[i]`, stopping at the first failure.
    ///
    /// Outputs written before a failure stay valid; nothing reports how many
    /// succeeded.
    pub fn generate_batch_into<S: AsRef<str>>(
        &self,
        texts: &[S],
        outputs: &mut [&mut [f32]],
        dimension: usize,
    ) -> Result<(), EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }
        if texts.len() != outputs.len() {
            return Err(EmbedError::BatchMismatch {
                texts: texts.len(),
                outputs: outputs.len(),
            });
        }
        for (text, output) in texts.iter().zip(outputs.iter_mut()) {
            self.generate_into(text.as_ref(), output, dimension)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_TEXT_LENGTH, SUPPORTED_DIMENSIONS};
    use crate::vector::{cosine_similarity, dot_product};

    fn embed(text: &str, dim: usize) -> Vec<f32> {
        EmbeddingGenerator::new().generate(text, dim).unwrap()
    }

    #[test]
    fn test_slot_values() {
        let v = embed("Hello", 128);
        assert_eq!(v.len(), 128);
        for seed in [0usize, 1, 77, 127] {
            let expected = hash_to_float(combined_hash(b"hello", seed as u64));
            assert_eq!(v[seed].to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_deterministic() {
        for dim in SUPPORTED_DIMENSIONS {
            let a = embed("determinism check", dim);
            let b = embed("determinism check", dim);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_values_in_range() {
        let v = embed("range check", 2048);
        assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn test_zero_dimension_uses_default() {
        assert_eq!(embed("text", 0), embed("text", 128));
    }

    #[test]
    fn test_prefix_shared_across_dimensions() {
        let short = embed("prefix", 128);
        let long = embed("prefix", 768);
        assert_eq!(&long[..128], &short[..]);
        assert_eq!(long.len(), 768);
    }

    #[test]
    fn test_discrimination() {
        let texts = ["Hello", "World", "FastEmbed", "Test", "Different"];
        let vectors: Vec<Vec<f32>> = texts.iter().map(|t| embed(t, 128)).collect();
        let mut pairs = 0;
        let mut dissimilar = 0;
        for i in 0..vectors.len() {
            for j in (i + 1)..vectors.len() {
                pairs += 1;
                if cosine_similarity(&vectors[i], &vectors[j]) < 0.99 {
                    dissimilar += 1;
                }
            }
        }
        assert!(dissimilar * 2 >= pairs, "{} of {} pairs dissimilar", dissimilar, pairs);
    }

    #[test]
    fn test_order_sensitive() {
        let ab = embed("ab", 128);
        let ba = embed("ba", 128);
        assert_ne!(ab, ba);
        assert!(ab.iter().zip(&ba).filter(|(x, y)| x != y).count() > 64);

        let forward = embed("Hello world", 128);
        let reversed = embed("world Hello", 128);
        assert!(cosine_similarity(&forward, &reversed) < 0.9);
    }

    #[test]
    fn test_case_folded() {
        let lower = embed("hello world", 256);
        assert_eq!(embed("Hello World", 256), lower);
        assert_eq!(embed("HELLO WORLD", 256), lower);
    }

    #[test]
    fn test_validation_boundary() {
        let gen = EmbeddingGenerator::new();
        for dim in [0, 128, 768] {
            assert!(matches!(gen.generate("", dim), Err(EmbedError::EmptyText)));
        }
        assert!(matches!(
            gen.generate("text", 100),
            Err(EmbedError::InvalidDimension(100))
        ));
        assert!(gen.generate(&"x".repeat(MAX_TEXT_LENGTH), 128).is_ok());
        assert!(matches!(
            gen.generate(&"x".repeat(MAX_TEXT_LENGTH + 1), 128),
            Err(EmbedError::TextTooLong { .. })
        ));
    }

    #[test]
    fn test_generate_into_small_buffer() {
        let mut buf = vec![0.0f32; 64];
        let result = EmbeddingGenerator::new().generate_into("text", &mut buf, 128);
        assert!(matches!(
            result,
            Err(EmbedError::OutputTooSmall { required: 128, actual: 64 })
        ));
    }

    #[test]
    fn test_generate_into_leaves_tail_untouched() {
        let mut buf = vec![9.0f32; 200];
        let dim = EmbeddingGenerator::new()
            .generate_into("text", &mut buf, 128)
            .unwrap();
        assert_eq!(dim.get(), 128);
        assert!(buf[128..].iter().all(|&x| x == 9.0));
    }

    #[test]
    fn test_batch_matches_single() {
        let gen = EmbeddingGenerator::new();
        let texts = ["first", "second", "third"];
        let batch = gen.generate_batch(&texts, 256).unwrap();
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(vector, &embed(text, 256));
        }
    }

    #[test]
    fn test_batch_stops_at_first_failure() {
        let gen = EmbeddingGenerator::new();
        let texts = ["ok", "", "never"];
        let mut a = vec![0.0f32; 128];
        let mut b = vec![0.0f32; 128];
        let mut c = vec![5.0f32; 128];
        let mut outputs: Vec<&mut [f32]> = vec![a.as_mut_slice(), b.as_mut_slice(), c.as_mut_slice()];
        let result = gen.generate_batch_into(&texts, &mut outputs, 128);
        assert!(matches!(result, Err(EmbedError::EmptyText)));
        assert_eq!(a, embed("ok", 128));
        assert!(c.iter().all(|&x| x == 5.0));
    }

    #[test]
    fn test_batch_rejects_empty_and_mismatched() {
        let gen = EmbeddingGenerator::new();
        let none: [&str; 0] = [];
        assert!(matches!(gen.generate_batch(&none, 128), Err(EmbedError::EmptyBatch)));

        let mut a = vec![0.0f32; 128];
        let mut outputs: Vec<&mut [f32]> = vec![a.as_mut_slice()];
        assert!(matches!(
            gen.generate_batch_into(&["a", "b"], &mut outputs, 128),
            Err(EmbedError::BatchMismatch { texts: 2, outputs: 1 })
        ));
    }

    #[test]
    fn test_end_to_end_similarity() {
        let a = embed("Hello, world! This is a test.", 768);
        let b = embed("Goodbye, world! Another test.", 768);
        let cos = cosine_similarity(&a, &b);
        assert!(cos.is_finite());
        assert!((-1.0..=1.0).contains(&cos));
        assert!(dot_product(&a, &b).is_finite());
    }
}
