use crossterm::{
    cursor, execute,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{Clear, ClearType},
};

use std::io::{BufWriter, Stdout, Write};

use crate::utilities::cache::UICache;
use crate::utilities::config::Settings;
use crate::utilities::input::Field;
use crate::utilities::state::ViewState;

const TITLE_ROW: u16 = 1;
const DIVIDER_ROW: u16 = 2;
const PANEL_ROW: u16 = 4;
const EFFECT_ROW: u16 = 13;
const MESSAGE_ROW: u16 = 19;
const CONTROLS_ROW: u16 = 21;

const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];

/// Nearest of eight compass glyphs for a rotation measured clockwise from up.
pub fn arrow_glyph(degrees: u16) -> char {
    let octant = (u32::from(degrees % 360) * 2 + 45) / 90 % 8;
    ARROWS[octant as usize]
}

fn draw_box_border(
    writer: &mut BufWriter<Stdout>,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let horizontal = format!("+{}+", "-".repeat(usize::from(width.saturating_sub(2))));
    execute!(writer, cursor::MoveTo(x, y), Print(&horizontal))?;
    for i in 1..height.saturating_sub(1) {
        execute!(
            writer,
            cursor::MoveTo(x, y + i),
            Print("|"),
            cursor::MoveTo(x + width - 1, y + i),
            Print("|"),
        )?;
    }
    execute!(writer, cursor::MoveTo(x, y + height - 1), Print(&horizontal))?;
    Ok(())
}

pub fn display_ui(
    view: &ViewState,
    settings: &Settings,
    ui_cache: &mut UICache,
    writer: &mut BufWriter<Stdout>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !ui_cache.refresh(view, settings) {
        return Ok(());
    }

    execute!(writer, ResetColor, Clear(ClearType::All))?;
    execute!(
        writer,
        cursor::MoveTo(20, TITLE_ROW),
        SetAttribute(Attribute::Bold),
        SetForegroundColor(Color::Magenta),
        Print("RANDOM CUE TIMER"),
        ResetColor,
        SetAttribute(Attribute::Reset),
        cursor::MoveTo(4, DIVIDER_ROW),
        SetForegroundColor(Color::Cyan),
        Print("=".repeat(66)),
        ResetColor,
    )?;

    draw_settings_panel(view, settings, writer)?;
    draw_countdown_panel(view, settings, writer)?;
    draw_effect_panel(view, writer)?;

    if let Some(message) = &view.message {
        execute!(
            writer,
            cursor::MoveTo(4, MESSAGE_ROW),
            SetForegroundColor(Color::Red),
            Print(message),
            ResetColor,
        )?;
    }

    let start_or_stop = if view.running { "Stop" } else { "Start" };
    let controls = [
        ("SPACE/ENTER", start_or_stop),
        ("TAB/S-TAB", "Select field"),
        ("0-9/BKSP", "Edit field"),
        ("UP/DOWN", "Adjust field by 1"),
        ("A", "Toggle arrow"),
        ("C", "Toggle countdown display"),
        ("Q/ESC", "Quit"),
    ];
    for (i, (key, desc)) in controls.iter().enumerate() {
        execute!(
            writer,
            cursor::MoveTo(6, CONTROLS_ROW + i as u16),
            SetForegroundColor(Color::Yellow),
            Print(format!("{key:12}")),
            SetForegroundColor(Color::DarkGrey),
            Print(format!(" - {desc}")),
            ResetColor,
        )?;
    }

    writer.flush()?;
    Ok(())
}

fn draw_settings_panel(
    view: &ViewState,
    settings: &Settings,
    writer: &mut BufWriter<Stdout>,
) -> Result<(), Box<dyn std::error::Error>> {
    draw_box_border(writer, 4, PANEL_ROW, 34, 8)?;

    for (i, field) in Field::ALL.iter().enumerate() {
        let value = match field {
            Field::MinSeconds => &settings.min_seconds,
            Field::MaxSeconds => &settings.max_seconds,
            Field::Sounds => &settings.sound_intensity,
            Field::Colors => &settings.color_intensity,
        };
        let focused = *field == view.focus;
        execute!(
            writer,
            cursor::MoveTo(6, PANEL_ROW + 1 + i as u16),
            SetForegroundColor(if focused { Color::Yellow } else { Color::White }),
            Print(format!(
                "{} {:14} [{:>5}]",
                if focused { '>' } else { ' ' },
                field.label(),
                value
            )),
            ResetColor,
        )?;
    }

    for (i, (label, on)) in [
        ("Arrow", settings.arrow_enabled),
        ("Show countdown", settings.show_countdown),
    ]
    .iter()
    .enumerate()
    {
        execute!(
            writer,
            cursor::MoveTo(8, PANEL_ROW + 5 + i as u16),
            SetForegroundColor(if *on { Color::Green } else { Color::DarkGrey }),
            Print(format!("{label:14} {}", if *on { "ON" } else { "OFF" })),
            ResetColor,
        )?;
    }
    Ok(())
}

fn draw_countdown_panel(
    view: &ViewState,
    settings: &Settings,
    writer: &mut BufWriter<Stdout>,
) -> Result<(), Box<dyn std::error::Error>> {
    draw_box_border(writer, 42, PANEL_ROW, 28, 8)?;

    let (status, color) = if view.running {
        ("RUNNING", Color::Green)
    } else {
        ("STOPPED", Color::Red)
    };
    execute!(
        writer,
        cursor::MoveTo(44, PANEL_ROW + 1),
        SetAttribute(Attribute::Bold),
        SetForegroundColor(color),
        Print(status),
        ResetColor,
        SetAttribute(Attribute::Reset),
    )?;

    if settings.show_countdown {
        execute!(
            writer,
            cursor::MoveTo(44, PANEL_ROW + 3),
            Print("Next cue in: "),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::White),
            Print(view.countdown_label()),
            ResetColor,
            SetAttribute(Attribute::Reset),
        )?;
    }

    execute!(
        writer,
        cursor::MoveTo(44, PANEL_ROW + 5),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("Cycles: {}", view.cycles)),
        ResetColor,
    )?;
    Ok(())
}

fn draw_effect_panel(
    view: &ViewState,
    writer: &mut BufWriter<Stdout>,
) -> Result<(), Box<dyn std::error::Error>> {
    draw_box_border(writer, 4, EFFECT_ROW, 66, 5)?;

    let swatch = match view.color {
        Some(color) => {
            let (r, g, b) = color.rgb();
            Color::Rgb { r, g, b }
        }
        None => Color::Reset,
    };
    execute!(
        writer,
        cursor::MoveTo(6, EFFECT_ROW + 1),
        Print("Color: "),
        SetBackgroundColor(swatch),
        Print("        "),
        ResetColor,
        Print(format!(" {}", view.color.map(|c| c.name()).unwrap_or("none"))),
    )?;

    if view.show_arrow {
        execute!(
            writer,
            cursor::MoveTo(36, EFFECT_ROW + 1),
            Print("Arrow: "),
            SetAttribute(Attribute::Bold),
            Print(arrow_glyph(view.rotation_degrees)),
            SetAttribute(Attribute::Reset),
            Print(format!(" {}°", view.rotation_degrees)),
        )?;
    }

    let sound = match view.last_sound {
        Some(index) => format!("#{}", index + 1),
        None => "none".to_string(),
    };
    execute!(
        writer,
        cursor::MoveTo(6, EFFECT_ROW + 3),
        Print(format!("Last sound: {sound}")),
    )?;
    Ok(())
}
