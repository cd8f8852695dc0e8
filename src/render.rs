//! Shared drawing vocabulary for the widget family: palette, fonts and the
//! track/dial primitives every analog control renders through.

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Arc, Circle, Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};
use libm::{cosf, sinf};

use crate::geometry::{Axis, Rect};

/// How much of a widget a draw pass may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderScope {
    /// Everything: frame, labels, buttons, tracks.
    Full,
    /// Only the drag-affected subset: fills, pointers, readouts. This is
    /// the scope used on every pointer move; it must never rebuild the
    /// widget chrome.
    Live,
}

pub const BG: Rgb565 = Rgb565::new(2, 4, 3);
pub const PANEL: Rgb565 = Rgb565::new(4, 8, 6);
pub const OUTLINE: Rgb565 = Rgb565::new(8, 16, 12);
pub const TRACK: Rgb565 = Rgb565::new(6, 12, 9);
pub const FILL: Rgb565 = Rgb565::new(6, 40, 28);
pub const ACCENT: Rgb565 = Rgb565::new(28, 40, 6);
pub const TEXT: Rgb565 = Rgb565::new(28, 58, 28);
pub const TEXT_DIM: Rgb565 = Rgb565::new(14, 30, 16);
pub const ALERT: Rgb565 = Rgb565::new(30, 16, 4);

pub const LABEL_FONT: &MonoFont = &FONT_6X10;
pub const VALUE_FONT: &MonoFont = &FONT_10X20;

pub fn label_style(color: Rgb565) -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyle::new(LABEL_FONT, color)
}

pub fn value_style(color: Rgb565) -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyle::new(VALUE_FONT, color)
}

pub fn fill_rect<D>(target: &mut D, rect: Rect, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::new(rect.x, rect.y), Size::new(rect.width, rect.height))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

pub fn stroke_rect<D>(target: &mut D, rect: Rect, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::new(rect.x, rect.y), Size::new(rect.width, rect.height))
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(target)
}

pub fn draw_text_centered<D>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
    style: MonoTextStyle<'static, Rgb565>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_alignment(text, Point::new(x, y), style, Alignment::Center).draw(target)?;
    Ok(())
}

/// Track plus proportional fill. `ratio` is the filled share in [0, 1];
/// inverted tracks fill from the far edge (vertical covers fill upward).
pub fn draw_linear_track<D>(
    target: &mut D,
    track: Rect,
    axis: Axis,
    invert: bool,
    ratio: f32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    fill_rect(target, track, TRACK)?;
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = match axis {
        Axis::Horizontal => {
            let width = (track.width as f32 * ratio) as u32;
            if invert {
                Rect::new(track.right() - width as i32, track.y, width, track.height)
            } else {
                Rect::new(track.x, track.y, width, track.height)
            }
        }
        Axis::Vertical => {
            let height = (track.height as f32 * ratio) as u32;
            if invert {
                Rect::new(track.x, track.bottom() - height as i32, track.width, height)
            } else {
                Rect::new(track.x, track.y, track.width, height)
            }
        }
    };
    if filled.width > 0 && filled.height > 0 {
        fill_rect(target, filled, FILL)?;
    }
    stroke_rect(target, track, OUTLINE)
}

/// Ring track with a pointer at `bearing` degrees (up = 0, clockwise).
pub fn draw_dial<D>(
    target: &mut D,
    cx: i32,
    cy: i32,
    radius: u32,
    start_deg: f32,
    end_deg: f32,
    bearing: f32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let diameter = radius * 2;
    let top_left = Point::new(cx - radius as i32, cy - radius as i32);
    Arc::new(
        top_left,
        diameter,
        arc_angle(start_deg),
        Angle::from_degrees(end_deg - start_deg),
    )
    .into_styled(PrimitiveStyle::with_stroke(TRACK, 4))
    .draw(target)?;
    Arc::new(
        top_left,
        diameter,
        arc_angle(start_deg),
        Angle::from_degrees(bearing - start_deg),
    )
    .into_styled(PrimitiveStyle::with_stroke(FILL, 4))
    .draw(target)?;

    let (px, py) = bearing_point(cx, cy, radius.saturating_sub(6), bearing);
    Line::new(Point::new(cx, cy), Point::new(px, py))
        .into_styled(PrimitiveStyle::with_stroke(ACCENT, 3))
        .draw(target)?;
    Circle::with_center(Point::new(cx, cy), 6)
        .into_styled(PrimitiveStyle::with_fill(ACCENT))
        .draw(target)
}

/// Point at `radius` from the center along a bearing (up = 0, clockwise).
pub fn bearing_point(cx: i32, cy: i32, radius: u32, bearing_deg: f32) -> (i32, i32) {
    let rad = bearing_deg * core::f32::consts::PI / 180.0;
    let x = cx + (sinf(rad) * radius as f32) as i32;
    let y = cy - (cosf(rad) * radius as f32) as i32;
    (x, y)
}

fn arc_angle(bearing_deg: f32) -> Angle {
    // embedded-graphics measures from the positive x-axis; bearings measure
    // from straight up.
    Angle::from_degrees(bearing_deg - 90.0)
}
