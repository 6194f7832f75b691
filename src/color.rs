//! Color token resolution for fill and background parameters.
//!
//! Tokens are either one of the 147 SVG/CSS named colors or a 3- or
//! 6-digit hex code with an optional leading `#`. Resolution never fails:
//! anything unrecognized resolves to black.

use image::Rgb;

/// Resolved when a token is neither a known name nor valid hex.
pub const FALLBACK_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Resolves a color token to an opaque RGB color.
///
/// Matching is case-insensitive and ignores one leading `#`. Named colors are
/// looked up first, then `RRGGBB` and `RGB` hex forms are tried. Unknown
/// tokens, wrong lengths and non-hex digits all resolve to black.
///
/// # Examples
/// ```
/// use image::Rgb;
/// use imageops_pipeline::resolve_color;
///
/// assert_eq!(resolve_color("#336699"), Rgb([0x33, 0x66, 0x99]));
/// assert_eq!(resolve_color("abc"), Rgb([0xaa, 0xbb, 0xcc]));
/// assert_eq!(resolve_color("CornflowerBlue"), Rgb([100, 149, 237]));
/// assert_eq!(resolve_color("not-a-color"), Rgb([0, 0, 0]));
/// ```
#[must_use]
pub fn resolve_color(token: &str) -> Rgb<u8> {
    let lowered = token.to_lowercase();
    let name = lowered.strip_prefix('#').unwrap_or(&lowered);

    if let Some(color) = lookup_named_color(name) {
        return color;
    }
    parse_hex_color(name).unwrap_or_else(|| {
        log::debug!(target: "filters", "unresolved color {token:?}, using black");
        FALLBACK_COLOR
    })
}

/// Looks up an already lowercased SVG/CSS color name.
#[must_use]
pub fn lookup_named_color(name: &str) -> Option<Rgb<u8>> {
    NAMED_COLORS
        .binary_search_by_key(&name, |&(candidate, _)| candidate)
        .ok()
        .map(|index| NAMED_COLORS[index].1)
}

/// Parses `RRGGBB` or `RGB` hex digits without a `#` prefix.
///
/// In the short form each digit `d` expands to `d * 17`, so `"f80"` is
/// `ff8800`.
#[must_use]
pub fn parse_hex_color(hex: &str) -> Option<Rgb<u8>> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|digit| digit as u8))
        .collect::<Option<Vec<u8>>>()?;

    match *digits.as_slice() {
        [r1, r2, g1, g2, b1, b2] => Some(Rgb([r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2])),
        [r, g, b] => Some(Rgb([r * 17, g * 17, b * 17])),
        _ => None,
    }
}

/// SVG 1.1 named colors, sorted by name for binary search.
static NAMED_COLORS: [(&str, Rgb<u8>); 147] = [
    ("aliceblue", Rgb([240, 248, 255])),
    ("antiquewhite", Rgb([250, 235, 215])),
    ("aqua", Rgb([0, 255, 255])),
    ("aquamarine", Rgb([127, 255, 212])),
    ("azure", Rgb([240, 255, 255])),
    ("beige", Rgb([245, 245, 220])),
    ("bisque", Rgb([255, 228, 196])),
    ("black", Rgb([0, 0, 0])),
    ("blanchedalmond", Rgb([255, 235, 205])),
    ("blue", Rgb([0, 0, 255])),
    ("blueviolet", Rgb([138, 43, 226])),
    ("brown", Rgb([165, 42, 42])),
    ("burlywood", Rgb([222, 184, 135])),
    ("cadetblue", Rgb([95, 158, 160])),
    ("chartreuse", Rgb([127, 255, 0])),
    ("chocolate", Rgb([210, 105, 30])),
    ("coral", Rgb([255, 127, 80])),
    ("cornflowerblue", Rgb([100, 149, 237])),
    ("cornsilk", Rgb([255, 248, 220])),
    ("crimson", Rgb([220, 20, 60])),
    ("cyan", Rgb([0, 255, 255])),
    ("darkblue", Rgb([0, 0, 139])),
    ("darkcyan", Rgb([0, 139, 139])),
    ("darkgoldenrod", Rgb([184, 134, 11])),
    ("darkgray", Rgb([169, 169, 169])),
    ("darkgreen", Rgb([0, 100, 0])),
    ("darkgrey", Rgb([169, 169, 169])),
    ("darkkhaki", Rgb([189, 183, 107])),
    ("darkmagenta", Rgb([139, 0, 139])),
    ("darkolivegreen", Rgb([85, 107, 47])),
    ("darkorange", Rgb([255, 140, 0])),
    ("darkorchid", Rgb([153, 50, 204])),
    ("darkred", Rgb([139, 0, 0])),
    ("darksalmon", Rgb([233, 150, 122])),
    ("darkseagreen", Rgb([143, 188, 143])),
    ("darkslateblue", Rgb([72, 61, 139])),
    ("darkslategray", Rgb([47, 79, 79])),
    ("darkslategrey", Rgb([47, 79, 79])),
    ("darkturquoise", Rgb([0, 206, 209])),
    ("darkviolet", Rgb([148, 0, 211])),
    ("deeppink", Rgb([255, 20, 147])),
    ("deepskyblue", Rgb([0, 191, 255])),
    ("dimgray", Rgb([105, 105, 105])),
    ("dimgrey", Rgb([105, 105, 105])),
    ("dodgerblue", Rgb([30, 144, 255])),
    ("firebrick", Rgb([178, 34, 34])),
    ("floralwhite", Rgb([255, 250, 240])),
    ("forestgreen", Rgb([34, 139, 34])),
    ("fuchsia", Rgb([255, 0, 255])),
    ("gainsboro", Rgb([220, 220, 220])),
    ("ghostwhite", Rgb([248, 248, 255])),
    ("gold", Rgb([255, 215, 0])),
    ("goldenrod", Rgb([218, 165, 32])),
    ("gray", Rgb([128, 128, 128])),
    ("green", Rgb([0, 128, 0])),
    ("greenyellow", Rgb([173, 255, 47])),
    ("grey", Rgb([128, 128, 128])),
    ("honeydew", Rgb([240, 255, 240])),
    ("hotpink", Rgb([255, 105, 180])),
    ("indianred", Rgb([205, 92, 92])),
    ("indigo", Rgb([75, 0, 130])),
    ("ivory", Rgb([255, 255, 240])),
    ("khaki", Rgb([240, 230, 140])),
    ("lavender", Rgb([230, 230, 250])),
    ("lavenderblush", Rgb([255, 240, 245])),
    ("lawngreen", Rgb([124, 252, 0])),
    ("lemonchiffon", Rgb([255, 250, 205])),
    ("lightblue", Rgb([173, 216, 230])),
    ("lightcoral", Rgb([240, 128, 128])),
    ("lightcyan", Rgb([224, 255, 255])),
    ("lightgoldenrodyellow", Rgb([250, 250, 210])),
    ("lightgray", Rgb([211, 211, 211])),
    ("lightgreen", Rgb([144, 238, 144])),
    ("lightgrey", Rgb([211, 211, 211])),
    ("lightpink", Rgb([255, 182, 193])),
    ("lightsalmon", Rgb([255, 160, 122])),
    ("lightseagreen", Rgb([32, 178, 170])),
    ("lightskyblue", Rgb([135, 206, 250])),
    ("lightslategray", Rgb([119, 136, 153])),
    ("lightslategrey", Rgb([119, 136, 153])),
    ("lightsteelblue", Rgb([176, 196, 222])),
    ("lightyellow", Rgb([255, 255, 224])),
    ("lime", Rgb([0, 255, 0])),
    ("limegreen", Rgb([50, 205, 50])),
    ("linen", Rgb([250, 240, 230])),
    ("magenta", Rgb([255, 0, 255])),
    ("maroon", Rgb([128, 0, 0])),
    ("mediumaquamarine", Rgb([102, 205, 170])),
    ("mediumblue", Rgb([0, 0, 205])),
    ("mediumorchid", Rgb([186, 85, 211])),
    ("mediumpurple", Rgb([147, 112, 219])),
    ("mediumseagreen", Rgb([60, 179, 113])),
    ("mediumslateblue", Rgb([123, 104, 238])),
    ("mediumspringgreen", Rgb([0, 250, 154])),
    ("mediumturquoise", Rgb([72, 209, 204])),
    ("mediumvioletred", Rgb([199, 21, 133])),
    ("midnightblue", Rgb([25, 25, 112])),
    ("mintcream", Rgb([245, 255, 250])),
    ("mistyrose", Rgb([255, 228, 225])),
    ("moccasin", Rgb([255, 228, 181])),
    ("navajowhite", Rgb([255, 222, 173])),
    ("navy", Rgb([0, 0, 128])),
    ("oldlace", Rgb([253, 245, 230])),
    ("olive", Rgb([128, 128, 0])),
    ("olivedrab", Rgb([107, 142, 35])),
    ("orange", Rgb([255, 165, 0])),
    ("orangered", Rgb([255, 69, 0])),
    ("orchid", Rgb([218, 112, 214])),
    ("palegoldenrod", Rgb([238, 232, 170])),
    ("palegreen", Rgb([152, 251, 152])),
    ("paleturquoise", Rgb([175, 238, 238])),
    ("palevioletred", Rgb([219, 112, 147])),
    ("papayawhip", Rgb([255, 239, 213])),
    ("peachpuff", Rgb([255, 218, 185])),
    ("peru", Rgb([205, 133, 63])),
    ("pink", Rgb([255, 192, 203])),
    ("plum", Rgb([221, 160, 221])),
    ("powderblue", Rgb([176, 224, 230])),
    ("purple", Rgb([128, 0, 128])),
    ("red", Rgb([255, 0, 0])),
    ("rosybrown", Rgb([188, 143, 143])),
    ("royalblue", Rgb([65, 105, 225])),
    ("saddlebrown", Rgb([139, 69, 19])),
    ("salmon", Rgb([250, 128, 114])),
    ("sandybrown", Rgb([244, 164, 96])),
    ("seagreen", Rgb([46, 139, 87])),
    ("seashell", Rgb([255, 245, 238])),
    ("sienna", Rgb([160, 82, 45])),
    ("silver", Rgb([192, 192, 192])),
    ("skyblue", Rgb([135, 206, 235])),
    ("slateblue", Rgb([106, 90, 205])),
    ("slategray", Rgb([112, 128, 144])),
    ("slategrey", Rgb([112, 128, 144])),
    ("snow", Rgb([255, 250, 250])),
    ("springgreen", Rgb([0, 255, 127])),
    ("steelblue", Rgb([70, 130, 180])),
    ("tan", Rgb([210, 180, 140])),
    ("teal", Rgb([0, 128, 128])),
    ("thistle", Rgb([216, 191, 216])),
    ("tomato", Rgb([255, 99, 71])),
    ("turquoise", Rgb([64, 224, 208])),
    ("violet", Rgb([238, 130, 238])),
    ("wheat", Rgb([245, 222, 179])),
    ("white", Rgb([255, 255, 255])),
    ("whitesmoke", Rgb([245, 245, 245])),
    ("yellow", Rgb([255, 255, 0])),
    ("yellowgreen", Rgb([154, 205, 50])),
];

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn named_colors_are_sorted_and_unique() {
        assert!(NAMED_COLORS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[rstest]
    #[case("cornflowerblue", [100, 149, 237])]
    #[case("RED", [255, 0, 0])]
    #[case("#white", [255, 255, 255])]
    #[case("rebeccapurple", [0, 0, 0])]
    fn resolve_color_with_names_returns_table_values(#[case] token: &str, #[case] expected: [u8; 3]) {
        assert_eq!(resolve_color(token), Rgb(expected));
    }

    #[rstest]
    #[case("#336699", [0x33, 0x66, 0x99])]
    #[case("336699", [0x33, 0x66, 0x99])]
    #[case("#FFaa00", [0xff, 0xaa, 0x00])]
    #[case("abc", [0xaa, 0xbb, 0xcc])]
    #[case("#0f0", [0x00, 0xff, 0x00])]
    fn resolve_color_with_hex_returns_parsed_channels(#[case] token: &str, #[case] expected: [u8; 3]) {
        assert_eq!(resolve_color(token), Rgb(expected));
    }

    #[rstest]
    #[case("not-a-color")]
    #[case("")]
    #[case("#")]
    #[case("12345")]
    #[case("1234567")]
    #[case("ggg")]
    #[case("12345z")]
    fn resolve_color_with_invalid_token_returns_black(#[case] token: &str) {
        assert_eq!(resolve_color(token), FALLBACK_COLOR);
    }

    #[test]
    fn parse_hex_color_with_short_form_duplicates_nibbles() {
        for digit in 0..16u8 {
            let hex = format!("{digit:x}{digit:x}{digit:x}");
            assert_eq!(parse_hex_color(&hex), Some(Rgb([digit * 17; 3])));
            assert_eq!(digit * 17, digit << 4 | digit);
        }
    }

    #[test]
    fn lookup_named_color_is_case_sensitive_on_lowered_input() {
        assert_eq!(lookup_named_color("navy"), Some(Rgb([0, 0, 128])));
        assert_eq!(lookup_named_color("Navy"), None);
    }
}
