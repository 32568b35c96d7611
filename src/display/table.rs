//! The VPP table shown next to the terminal chart. Hovering a boat speed
//! cell produces the same pointer target a hover over the HTML table would.

use ratatui::prelude::*;

use crate::color::ColorScheme;
use crate::events::PointerTarget;
use crate::geometry::fmt_num;
use crate::series::{twa_tag, tws_tag};
use crate::vpp::VppDataset;

/// Characters per column, the TWA column included.
pub const COLUMN_WIDTH: u16 = 7;

pub struct TableView;

impl TableView {
    /// Columns needed to show every wind speed.
    pub fn width(vpp: &VppDataset) -> u16 {
        let columns = u16::try_from(vpp.speeds.len().saturating_add(1)).unwrap_or(u16::MAX);
        COLUMN_WIDTH.saturating_mul(columns)
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        vpp: &VppDataset,
        hovered: Option<(f64, f64)>,
        scheme: ColorScheme,
    ) {
        if area.height == 0 {
            return;
        }
        let header = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
        let buf = frame.buffer_mut();

        put(buf, area, 0, 0, "TWA", header);
        for (i, speed) in vpp.speeds.iter().enumerate() {
            let (r, g, b) = scheme.series_color(i, vpp.speeds.len());
            let label = format!("{}kts", fmt_num(*speed));
            put(buf, area, i + 1, 0, &label, header.fg(Color::Rgb(r, g, b)));
        }

        for (row, (angle, sogs)) in vpp.rows().enumerate() {
            let y = row as u16 + 1;
            if y >= area.height {
                break;
            }
            put(buf, area, 0, y, &format!("{}°", fmt_num(angle)), header);
            for (i, sog) in sogs.iter().enumerate() {
                let style = match hovered {
                    Some((twa, tws))
                        if fmt_num(twa) == fmt_num(angle) && fmt_num(tws) == fmt_num(vpp.speeds[i]) =>
                    {
                        Style::default().fg(Color::Black).bg(Color::White)
                    }
                    _ => Style::default().fg(Color::DarkGray),
                };
                put(buf, area, i + 1, y, &format!("{:.2}", sog), style);
            }
        }
    }

    /// What a pointer at terminal cell (`column`, `row`) is over. Only boat
    /// speed cells carry tags; everything else reads as no target.
    pub fn hit_test(area: Rect, vpp: &VppDataset, column: u16, row: u16) -> PointerTarget {
        if column < area.x || row <= area.y || column >= area.right() || row >= area.bottom() {
            return PointerTarget::none();
        }
        let cell = ((column - area.x) / COLUMN_WIDTH) as usize;
        let line = (row - area.y - 1) as usize;
        if cell == 0 {
            return PointerTarget::none();
        }
        match (vpp.speeds.get(cell - 1), vpp.angles.get(line)) {
            (Some(&tws), Some(&twa)) => {
                PointerTarget::new(&[tws_tag(tws).as_str()], &[twa_tag(twa).as_str()])
            }
            _ => PointerTarget::none(),
        }
    }
}

fn put(buf: &mut Buffer, area: Rect, cell: usize, y: u16, text: &str, style: Style) {
    let x = u16::try_from(cell)
        .ok()
        .and_then(|c| c.checked_mul(COLUMN_WIDTH))
        .and_then(|offset| area.x.checked_add(offset));
    let Some(x) = x.filter(|x| *x < area.right()) else {
        return;
    };
    if y >= area.height {
        return;
    }
    let room = (area.right() - x).min(COLUMN_WIDTH - 1) as usize;
    buf.set_stringn(x, area.y + y, text, room, style);
}
