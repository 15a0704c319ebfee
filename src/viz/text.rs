//! Title measurement and truncation.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Shrink the font until `text` fits `max_px`, but not below `min_px`.
pub fn fit_font_px(text: &str, font_px: u32, min_px: u32, max_px: u32) -> u32 {
    let mut px = font_px;
    while px > min_px && estimate_text_width_px(text, px) > max_px {
        px -= 1;
    }
    px
}

/// Truncate to fit `max_px`, ending with a single ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}…");
        if estimate_text_width_px(&next, font_px) > max_px {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_titles_shrink_then_truncate() {
        let t = "Random County from District of Columbia - District of Columbia Highlighted";
        let px = fit_font_px(t, 22, 12, 400);
        assert_eq!(px, 12);
        let cut = truncate_to_width(t, px, 400);
        assert!(cut.ends_with('…'));
        assert!(estimate_text_width_px(&cut, px) <= 400);
    }

    #[test]
    fn short_titles_untouched() {
        assert_eq!(fit_font_px("Kalawao, Hawaii", 22, 12, 800), 22);
        assert_eq!(truncate_to_width("Kalawao, Hawaii", 22, 800), "Kalawao, Hawaii");
    }
}
