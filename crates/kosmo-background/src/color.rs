//! Color utility functions for background animations.

use ratatui::style::Color;

/// Mix `fg` over `bg` with the given opacity (0.0-1.0).
///
/// Terminals have no alpha channel, so translucency is approximated by
/// blending toward the color underneath. Non-RGB colors snap to whichever
/// side dominates.
pub fn blend(fg: Color, bg: Color, opacity: f32) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => Color::Rgb(
            mix(fr, br, opacity),
            mix(fg_, bg_, opacity),
            mix(fb, bb, opacity),
        ),
        _ if opacity >= 0.5 => fg,
        _ => bg,
    }
}

/// Sample a gradient with evenly spaced stops at `t` (0.0-1.0).
pub fn gradient(stops: &[Color], t: f32) -> Color {
    match stops {
        [] => Color::Reset,
        [only] => *only,
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let idx = (scaled as usize).min(stops.len() - 2);
            blend(stops[idx + 1], stops[idx], scaled - idx as f32)
        }
    }
}

fn mix(a: u8, b: u8, t: f32) -> u8 {
    (b as f32 + (a as f32 - b as f32) * t).round() as u8
}
