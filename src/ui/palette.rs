/// Color tags carried by every frame buffer cell.
///
/// The scene only ever speaks in tones; they become terminal colors at
/// present time.

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[allow(dead_code)]
    Reset,
    Red,
    Blue,
    White,
    Yellow,
    Dim,
    Cyan,
    #[allow(dead_code)]
    Green,
    #[default]
    Black,
    Shadow,
}

impl Tone {
    pub fn color(self) -> Color {
        match self {
            Tone::Reset => Color::Reset,
            Tone::Red => Color::Red,
            Tone::Blue => Color::Blue,
            Tone::White => Color::White,
            Tone::Yellow => Color::Yellow,
            Tone::Dim => Color::DarkGrey,
            Tone::Cyan => Color::Cyan,
            Tone::Green => Color::Green,
            Tone::Black => Color::Black,
            Tone::Shadow => Color::Rgb { r: 58, g: 58, b: 58 },
        }
    }

    /// Tones a light source may repaint.
    pub fn is_ambient(self) -> bool {
        matches!(self, Tone::Dim | Tone::White)
    }
}
