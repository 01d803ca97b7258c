//! Compositing: draw an element off-screen, then copy it onto the frame
//! with its visual transform applied.
//!
//! Terminal cells cannot be rotated or sub-cell scaled, so the transform is
//! approximated: offsets move the copy by whole cells, scale resizes the box
//! the element is drawn into (around its centre), and opacity blends colours
//! toward the black page background.  Cells the element never wrote are
//! transparent.

use ratatui::{
    buffer::{Buffer, Cell},
    layout::Rect,
    style::{Color, Modifier},
};

use crate::motion::props::Visual;
use crate::motion::trigger::ElementBox;

/// Below this opacity an element is not drawn at all.
const INVISIBLE: f64 = 0.05;
/// Below this opacity named colours, which cannot be blended, are dimmed.
const DIM_BELOW: f64 = 0.6;

/// Where a transformed element lands, in signed screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

/// Apply `visual`'s offset and scale to a resting screen box.  `None` when
/// the result is too small to draw or fully transparent.
pub fn place(bx: ElementBox, visual: &Visual) -> Option<Placement> {
    if visual.opacity < INVISIBLE {
        return None;
    }
    let scale = visual.scale.max(0.0);
    let width = (bx.width * scale).round();
    let height = (bx.height * scale).round();
    if width < 1.0 || height < 1.0 || width > u16::MAX as f64 || height > u16::MAX as f64 {
        return None;
    }
    let cx = bx.left + bx.width / 2.0 + visual.offset_x(bx.width);
    let cy = bx.top + bx.height / 2.0 + visual.offset_y(bx.height);
    Some(Placement {
        x: (cx - width / 2.0).round() as i32,
        y: (cy - height / 2.0).round() as i32,
        width: width as u16,
        height: height as u16,
    })
}

/// Screen rectangle of an untransformed box, clipped to `bounds`.
pub fn clip_rect(bx: ElementBox, bounds: Rect) -> Rect {
    let x0 = bx.left.round().max(bounds.x as f64);
    let y0 = bx.top.round().max(bounds.y as f64);
    let x1 = (bx.left + bx.width).round().min(bounds.right() as f64);
    let y1 = (bx.top + bx.height).round().min(bounds.bottom() as f64);
    if x1 <= x0 || y1 <= y0 {
        return Rect::new(bounds.x, bounds.y, 0, 0);
    }
    Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16)
}

/// Run `draw` into a fresh buffer of the given size.
pub fn render_offscreen(width: u16, height: u16, draw: impl FnOnce(Rect, &mut Buffer)) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    draw(area, &mut buf);
    buf
}

/// Copy `src` onto `dst` with its origin at (`x`, `y`), writing only inside
/// `clip` and fading by `opacity`.
pub fn blit(src: &Buffer, dst: &mut Buffer, x: i32, y: i32, clip: Rect, opacity: f64) {
    if opacity < INVISIBLE {
        return;
    }
    let clip = clip.intersection(dst.area);
    let blank = Cell::default();
    let area = src.area;

    for row in 0..area.height {
        let ty = y + row as i32;
        if ty < clip.y as i32 || ty >= clip.bottom() as i32 {
            continue;
        }
        for col in 0..area.width {
            let tx = x + col as i32;
            if tx < clip.x as i32 || tx >= clip.right() as i32 {
                continue;
            }
            let cell = &src[(area.x + col, area.y + row)];
            if *cell == blank {
                continue;
            }
            let mut cell = cell.clone();
            fade(&mut cell, opacity);
            dst[(tx as u16, ty as u16)] = cell;
        }
    }
}

/// Blend a cell toward black.
pub fn fade(cell: &mut Cell, opacity: f64) {
    if opacity >= 0.999 {
        return;
    }
    let opacity = opacity.clamp(0.0, 1.0);
    let blendable = matches!(cell.fg, Color::Rgb(..));
    cell.fg = fade_color(cell.fg, opacity);
    cell.bg = fade_color(cell.bg, opacity);
    if !blendable && opacity < DIM_BELOW {
        cell.modifier.insert(Modifier::DIM);
    }
}

fn fade_color(color: Color, opacity: f64) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = |c: u8| (c as f64 * opacity).round() as u8;
            Color::Rgb(f(r), f(g), f(b))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn blit_clips_to_the_destination() {
        let src = render_offscreen(3, 1, |area, buf| {
            buf.set_string(area.x, area.y, "abc", Style::default());
        });
        let area = Rect::new(0, 0, 5, 1);
        let mut dst = Buffer::empty(area);
        blit(&src, &mut dst, -1, 0, area, 1.0);
        assert_eq!(row(&dst, 0), "bc   ");

        let mut dst = Buffer::empty(area);
        blit(&src, &mut dst, 3, 0, area, 1.0);
        assert_eq!(row(&dst, 0), "   ab");
    }

    #[test]
    fn untouched_cells_are_transparent() {
        let src = render_offscreen(3, 1, |area, buf| {
            buf.set_string(area.x + 1, area.y, "o", Style::default());
        });
        let area = Rect::new(0, 0, 5, 1);
        let mut dst = Buffer::empty(area);
        dst.set_string(0, 0, "xxxxx", Style::default());
        blit(&src, &mut dst, 1, 0, area, 1.0);
        assert_eq!(row(&dst, 0), "xxoxx");
    }

    #[test]
    fn clip_rect_masks_a_sliding_copy() {
        let src = render_offscreen(4, 1, |area, buf| {
            buf.set_string(area.x, area.y, "line", Style::default());
        });
        let mut dst = Buffer::empty(Rect::new(0, 0, 6, 3));
        let mask = clip_rect(
            ElementBox {
                left: 1.0,
                top: 1.0,
                width: 4.0,
                height: 1.0,
            },
            dst.area,
        );
        // Slid one row down: entirely outside its mask.
        blit(&src, &mut dst, 1, 2, mask, 1.0);
        assert_eq!(row(&dst, 2), "      ");
        blit(&src, &mut dst, 1, 1, mask, 1.0);
        assert_eq!(row(&dst, 1), " line ");
    }

    #[test]
    fn opacity_blends_true_colour_and_dims_named_colour() {
        let mut cell = Cell::default();
        cell.set_symbol("x").set_fg(Color::Rgb(200, 100, 50));
        fade(&mut cell, 0.5);
        assert_eq!(cell.fg, Color::Rgb(100, 50, 25));
        assert!(!cell.modifier.contains(Modifier::DIM));

        let mut cell = Cell::default();
        cell.set_symbol("x").set_fg(Color::White);
        fade(&mut cell, 0.3);
        assert_eq!(cell.fg, Color::White);
        assert!(cell.modifier.contains(Modifier::DIM));
    }

    #[test]
    fn place_scales_about_the_centre() {
        let bx = ElementBox {
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 4.0,
        };
        let half = Visual {
            scale: 0.5,
            ..Visual::default()
        };
        assert_eq!(
            place(bx, &half),
            Some(Placement {
                x: 3,
                y: 1,
                width: 5,
                height: 2
            })
        );

        let shifted = Visual {
            x: 2.0,
            y_percent: 100.0,
            ..Visual::default()
        };
        let p = place(bx, &shifted).unwrap();
        assert_eq!((p.x, p.y, p.width, p.height), (2, 4, 10, 4));

        let hidden = Visual {
            opacity: 0.0,
            ..Visual::default()
        };
        assert_eq!(place(bx, &hidden), None);
    }
}
