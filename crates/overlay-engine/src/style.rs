//! Style descriptors for highlight spans

use shared_types::{Annotation, ClauseCatalog};

use crate::config::OverlayConfig;

/// Parse `#rgb` or `#rrggbb`
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// Translucent version of a color; non-hex colors are passed through
pub fn tint(color: &str, alpha: f64) -> String {
    match parse_hex_color(color) {
        Some((r, g, b)) => format!("rgba({}, {}, {}, {})", r, g, b, alpha),
        None => color.to_string(),
    }
}

/// Highlight color for an annotation
pub fn highlight_color<'a>(
    annotation: &Annotation,
    catalog: &'a ClauseCatalog,
    config: &'a OverlayConfig,
) -> &'a str {
    match catalog.get(&annotation.clause_type) {
        Some(info) => &info.color,
        None if annotation.is_user() => &config.user_color,
        None => &config.fallback_color,
    }
}

/// Inline CSS for a highlight span. User annotations get a dashed underline.
pub fn highlight_style(color: &str, user_authored: bool, config: &OverlayConfig) -> String {
    let line = if user_authored { "dashed" } else { "solid" };
    format!(
        "background-color: {}; border-bottom: 2px {} {}; box-shadow: 0 1px 2px {}; cursor: pointer",
        tint(color, config.fill_alpha),
        line,
        color,
        tint(color, config.shadow_alpha)
    )
}

pub fn tooltip(annotation: &Annotation, catalog: &ClauseCatalog) -> String {
    let name = catalog.display_name(&annotation.clause_type);
    match annotation.comment() {
        Some(comment) if !comment.is_empty() => format!("{}: {}", name, comment),
        Some(_) => name,
        None => format!("{} ({}%)", name, annotation.confidence()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::TextPosition;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_hex_color("#3b82f6"), Some((59, 130, 246)));
        assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("blue"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_tint_passes_named_colors_through() {
        assert_eq!(tint("#000000", 0.5), "rgba(0, 0, 0, 0.5)");
        assert_eq!(tint("tomato", 0.5), "tomato");
    }

    #[test]
    fn test_user_and_detected_styles_differ() {
        let config = OverlayConfig::default();
        let detected = highlight_style("#3b82f6", false, &config);
        let user = highlight_style("#3b82f6", true, &config);
        assert!(detected.contains("2px solid #3b82f6"));
        assert!(user.contains("2px dashed #3b82f6"));
        assert!(detected.contains("rgba(59, 130, 246, 0.18)"));
    }

    #[test]
    fn test_color_fallbacks() {
        let config = OverlayConfig::default();
        let catalog = ClauseCatalog::new().with("indemnity", "Indemnity", "#ef4444");
        let position = Some(TextPosition::new(0, 4));

        let known = Annotation::detected("indemnity", "x", position, 80.0, "r");
        let unknown = Annotation::detected("warranty", "x", position, 80.0, "r");
        let user = Annotation::user("question", "x", TextPosition::new(0, 4), "why?");

        assert_eq!(highlight_color(&known, &catalog, &config), "#ef4444");
        assert_eq!(highlight_color(&unknown, &catalog, &config), config.fallback_color);
        assert_eq!(highlight_color(&user, &catalog, &config), config.user_color);
    }

    #[test]
    fn test_tooltips() {
        let catalog = ClauseCatalog::new().with("indemnity", "Indemnity", "#ef4444");
        let detected =
            Annotation::detected("indemnity", "x", Some(TextPosition::new(0, 1)), 87.5, "r");
        let user = Annotation::user("indemnity", "x", TextPosition::new(0, 1), "Too broad");

        assert_eq!(tooltip(&detected, &catalog), "Indemnity (87.5%)");
        assert_eq!(tooltip(&user, &catalog), "Indemnity: Too broad");
    }
}
