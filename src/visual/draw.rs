/// Side length of EMNIST images.
pub const IMAGE_SIDE: usize = 28;

/// Density ramp, darkest first.
const RAMP: [char; 5] = ['█', '▓', '▒', '░', ' '];

/// Renders a 28×28 input vector as text. See [`draw_grid`].
pub fn draw(inputs: &[f64]) -> String {
    draw_grid(inputs, IMAGE_SIDE)
}

/// Renders a `side × side` input vector as `side` lines of text, two glyphs
/// per pixel so the picture keeps its aspect ratio in a terminal.
///
/// Pixels are read column-major (`inputs[row + col * side]`): EMNIST stores
/// its images transposed. Missing trailing pixels render blank.
pub fn draw_grid(inputs: &[f64], side: usize) -> String {
    let mut out = String::with_capacity(side * (side * 2 + 1) * 3);

    for row in 0..side {
        for col in 0..side {
            let glyph = inputs.get(row + col * side).map_or(' ', |&v| glyph(v));
            out.push(glyph);
            out.push(glyph);
        }
        out.push('\n');
    }

    out
}

/// Ramp glyph for one intensity in [0, 1]. Anything below the first
/// threshold (NaN included) is blank; anything above 1 is solid.
pub fn glyph(value: f64) -> char {
    if value.is_nan() || value < 0.2 {
        RAMP[4]
    } else if value < 0.4 {
        RAMP[3]
    } else if value < 0.6 {
        RAMP[2]
    } else if value < 0.8 {
        RAMP[1]
    } else {
        RAMP[0]
    }
}
