//! Deterministic placeholder artwork.
//!
//! Derives a gradient color pair and a text label from a seed string and
//! renders a square SVG. Pure function: the same seed and size always produce
//! byte-identical output, so responses are safely cacheable by URL.

/// Default edge length in pixels when the caller does not specify one.
const DEFAULT_SIZE: u32 = 800;
/// Smallest allowed edge length.
const MIN_SIZE: u32 = 200;
/// Largest allowed edge length.
const MAX_SIZE: u32 = 1600;

/// Gradient color pairs the hash selects from.
const COLOR_PAIRS: &[(&str, &str)] = &[
    ("#8B5CF6", "#14B8A6"),
    ("#14B8A6", "#F59E0B"),
    ("#8B5CF6", "#F59E0B"),
];

/// 32-bit string hash over UTF-16 code units.
///
/// Matches the widely used `h = (h << 5) - h + c` JavaScript idiom so seeds
/// produced by existing clients keep mapping to the same colors.
fn hash_code(s: &str) -> i32 {
    let mut h: i32 = 0;
    for c in s.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(c));
    }
    h
}

/// Escape the five XML-special characters in a text node.
fn escape_xml(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the SVG for `seed` at the requested edge length.
///
/// `size` is clamped to `[200, 1600]` and defaults to 800. Empty seeds fall
/// back to `"nft"` so anonymous placeholders still render a label.
pub fn generate(seed: &str, size: Option<u32>) -> String {
    let seed = if seed.is_empty() { "nft" } else { seed };
    let size = size.unwrap_or(DEFAULT_SIZE).clamp(MIN_SIZE, MAX_SIZE);

    let idx = hash_code(seed).unsigned_abs() as usize % COLOR_PAIRS.len();
    let (from, to) = COLOR_PAIRS[idx];

    let s = f64::from(size);
    let label = escape_xml(seed);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">
  <defs>
    <linearGradient id="g" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="{from}"/>
      <stop offset="100%" stop-color="{to}"/>
    </linearGradient>
    <filter id="glass">
      <feGaussianBlur stdDeviation="20" result="blur"/>
      <feColorMatrix type="matrix" values="0 0 0 0 0.98  0 0 0 0 0.96  0 0 0 0 0.93  0 0 0 0.6 0"/>
    </filter>
  </defs>
  <rect width="100%" height="100%" fill="url(#g)"/>
  <circle cx="{cx}" cy="{cy}" r="{r}" fill="#ffffff30" filter="url(#glass)"/>
  <rect x="{rx}" y="{ry}" rx="{corner}" ry="{corner}" width="{rw}" height="{rh}" fill="#00000020"/>
  <text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle"
    font-family="Inter, system-ui, -apple-system" font-size="{font}" fill="#ffffff"
    style="letter-spacing:1px">{label}</text>
</svg>"##,
        cx = s * 0.7,
        cy = s * 0.3,
        r = s * 0.35,
        rx = s * 0.1,
        ry = s * 0.6,
        corner = s * 0.05,
        rw = s * 0.8,
        rh = s * 0.25,
        font = s * 0.08,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_for_same_seed() {
        assert_eq!(generate("cosmic-ape", None), generate("cosmic-ape", None));
    }

    #[test]
    fn test_different_seeds_can_differ() {
        // Not guaranteed for arbitrary pairs, but these hash to different pairs.
        let a = generate("a", None);
        let b = generate("ab", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_size_clamped() {
        let tiny = generate("x", Some(10));
        assert!(tiny.contains(r#"width="200""#));

        let huge = generate("x", Some(99999));
        assert!(huge.contains(r#"width="1600""#));

        let default = generate("x", None);
        assert!(default.contains(r#"width="800""#));
    }

    #[test]
    fn test_seed_text_is_escaped() {
        let svg = generate("<script>&\"'", None);
        assert!(svg.contains("&lt;script&gt;&amp;&quot;&apos;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn test_empty_seed_falls_back() {
        let svg = generate("", None);
        assert!(svg.contains(">nft</text>"));
    }

    #[test]
    fn test_color_pair_from_known_hash() {
        // hash_code("") == 0 is never hit (empty falls back to "nft"); verify
        // the selected pair is always one of the fixed palette entries.
        let svg = generate("seed", None);
        assert!(COLOR_PAIRS.iter().any(|(from, _)| svg.contains(from)));
    }
}
