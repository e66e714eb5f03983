//! Colour palette and anti-repeat selection.

use contracts::Rgb;
use rand::Rng;

/// A named palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub name: &'static str,
    pub rgb: Rgb,
}

/// Vivid colours that render well on RGB bulbs
pub const PALETTE: [Colour; 11] = [
    Colour { name: "dark red", rgb: Rgb { r: 174, g: 0, b: 0 } },
    Colour { name: "red", rgb: Rgb { r: 255, g: 0, b: 0 } },
    Colour { name: "orange-red", rgb: Rgb { r: 255, g: 102, b: 0 } },
    Colour { name: "yellow", rgb: Rgb { r: 255, g: 239, b: 0 } },
    Colour { name: "chartreuse", rgb: Rgb { r: 153, g: 255, b: 0 } },
    Colour { name: "lime", rgb: Rgb { r: 40, g: 255, b: 0 } },
    Colour { name: "aqua", rgb: Rgb { r: 0, g: 255, b: 242 } },
    Colour { name: "sky blue", rgb: Rgb { r: 0, g: 122, b: 255 } },
    Colour { name: "blue", rgb: Rgb { r: 5, g: 0, b: 255 } },
    Colour { name: "deep blue", rgb: Rgb { r: 71, g: 0, b: 237 } },
    Colour { name: "indigo", rgb: Rgb { r: 99, g: 0, b: 178 } },
];

/// Upper bound on redraws after the initial draw before a repeat is accepted
const MAX_REDRAWS: usize = 5;

/// Pick a palette colour, avoiding `excluding` on a best-effort basis.
///
/// Draws once, then redraws at most [`MAX_REDRAWS`] times while the draw
/// matches `excluding`, so selection terminates even for a single-entry
/// palette, where a repeat is unavoidable.
pub fn pick(excluding: Option<Rgb>) -> Colour {
    pick_from(&PALETTE, excluding, &mut rand::thread_rng())
}

fn pick_from<R: Rng>(palette: &[Colour], excluding: Option<Rgb>, rng: &mut R) -> Colour {
    let mut chosen = palette[rng.gen_range(0..palette.len())];
    if let Some(last) = excluding {
        for _ in 0..MAX_REDRAWS {
            if chosen.rgb != last {
                break;
            }
            chosen = palette[rng.gen_range(0..palette.len())];
        }
    }
    chosen
}

/// Human-readable name of a palette colour, if it is one
pub fn name_of(rgb: Rgb) -> Option<&'static str> {
    PALETTE.iter().find(|c| c.rgb == rgb).map(|c| c.name)
}
