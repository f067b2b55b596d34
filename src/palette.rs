//! Preset colors offered by the editor: 64 saturated colors that read well on
//! a 32×32 LED matrix.

use crate::drawing::Rgb;

/// Number of preset colors
pub const PRESET_LEN: usize = 64;

const PRESET: [Rgb; PRESET_LEN] = [
    // primaries and essentials
    Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0xff, 0x00, 0x00),
    Rgb::new(0x00, 0xff, 0x00),
    Rgb::new(0x00, 0x00, 0xff),
    Rgb::new(0xff, 0xff, 0x00),
    Rgb::new(0xff, 0x00, 0xff),
    Rgb::new(0x00, 0xff, 0xff),
    // blues
    Rgb::new(0x1e, 0x90, 0xff),
    Rgb::new(0x00, 0xbf, 0xff),
    Rgb::new(0x41, 0x69, 0xe1),
    Rgb::new(0x00, 0x00, 0xcd),
    Rgb::new(0x00, 0x00, 0x80),
    Rgb::new(0x19, 0x19, 0x70),
    Rgb::new(0x00, 0xce, 0xd1),
    Rgb::new(0x48, 0xd1, 0xcc),
    Rgb::new(0x87, 0xce, 0xeb),
    Rgb::new(0x46, 0x82, 0xb4),
    // greens
    Rgb::new(0x00, 0xff, 0x7f),
    Rgb::new(0x32, 0xcd, 0x32),
    Rgb::new(0x7c, 0xfc, 0x00),
    Rgb::new(0x00, 0xfa, 0x9a),
    Rgb::new(0x22, 0x8b, 0x22),
    Rgb::new(0x2e, 0x8b, 0x57),
    Rgb::new(0x3c, 0xb3, 0x71),
    Rgb::new(0x66, 0xcd, 0xaa),
    Rgb::new(0x7f, 0xff, 0xd4),
    // yellows and oranges
    Rgb::new(0xff, 0xd7, 0x00),
    Rgb::new(0xff, 0xa5, 0x00),
    Rgb::new(0xff, 0x8c, 0x00),
    Rgb::new(0xff, 0x45, 0x00),
    Rgb::new(0xff, 0x63, 0x47),
    Rgb::new(0xff, 0x7f, 0x50),
    Rgb::new(0xff, 0xa0, 0x7a),
    Rgb::new(0xff, 0xda, 0xb9),
    // pinks and reds
    Rgb::new(0xff, 0x69, 0xb4),
    Rgb::new(0xff, 0x14, 0x93),
    Rgb::new(0xdc, 0x14, 0x3c),
    Rgb::new(0xb2, 0x22, 0x22),
    Rgb::new(0x8b, 0x00, 0x00),
    Rgb::new(0xff, 0xc0, 0xcb),
    Rgb::new(0xff, 0xb6, 0xc1),
    // purples
    Rgb::new(0x8a, 0x2b, 0xe2),
    Rgb::new(0x94, 0x00, 0xd3),
    Rgb::new(0x99, 0x32, 0xcc),
    Rgb::new(0xba, 0x55, 0xd3),
    Rgb::new(0xda, 0x70, 0xd6),
    Rgb::new(0xee, 0x82, 0xee),
    Rgb::new(0xdd, 0xa0, 0xdd),
    Rgb::new(0x93, 0x70, 0xdb),
    Rgb::new(0x7b, 0x68, 0xee),
    // grays
    Rgb::new(0x2a, 0x2a, 0x2a),
    Rgb::new(0x55, 0x55, 0x55),
    Rgb::new(0x80, 0x80, 0x80),
    Rgb::new(0xaa, 0xaa, 0xaa),
    Rgb::new(0xd5, 0xd5, 0xd5),
    // in-between hues
    Rgb::new(0xff, 0x00, 0x80),
    Rgb::new(0xff, 0x40, 0x00),
    Rgb::new(0xff, 0x80, 0x00),
    Rgb::new(0xff, 0xc0, 0x00),
    Rgb::new(0x80, 0xff, 0x00),
    Rgb::new(0x40, 0xff, 0x00),
    Rgb::new(0x00, 0xff, 0x40),
    Rgb::new(0x00, 0xff, 0x80),
];

/// The preset colors, black and white first.
pub fn preset() -> &'static [Rgb] {
    &PRESET
}
