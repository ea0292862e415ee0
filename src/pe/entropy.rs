//! Shannon entropy over raw section bytes

/// Shannon entropy of a byte slice in bits per byte, 0.0..=8.0.
///
/// Used heuristically: values near 8.0 indicate compressed or encrypted
/// content, a common packer signature.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &count in &counts {
        if count > 0 {
            let p = count as f64 / len;
            entropy -= p * p.log2();
        }
    }

    entropy
}
