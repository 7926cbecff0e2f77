//! Layout of the driver's daily log sheet.
//!
//! Everything is placed on one landscape A4 page. The header, mileage boxes
//! and the 24-hour duty grid sit at fixed positions measured from the top
//! margin. The remarks, shipping and recap sections follow the grid, each one
//! starting below the measured end of the previous one. The two signature
//! lines are anchored to the bottom margin.

use rust_decimal::Decimal;
use tracing::debug;

use super::RenderError;
use super::canvas::{Canvas, FontWeight, Rgb};
use super::pdf_canvas::PdfCanvas;
use crate::db::entities::daily_log;
use crate::db::enums::ActivityKind;
use crate::services::hours_service::HourTotals;

pub const PAGE_WIDTH: f32 = 841.89;
pub const PAGE_HEIGHT: f32 = 595.28;
pub const MARGIN: f32 = 36.0;

/// Width of the hour axis; hour 0 sits on the left margin.
pub const GRID_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Half an inch between activity rows.
pub const ROW_SPACING: f32 = 36.0;
/// y of the first (Off Duty) row.
pub const GRID_TOP: f32 = PAGE_HEIGHT - MARGIN - 130.0;
const GRID_OVERHANG: f32 = 14.0;
const GRID_BOTTOM: f32 = GRID_TOP - ROW_SPACING * 3.0 - GRID_OVERHANG;

const HEADER_Y: f32 = PAGE_HEIGHT - MARGIN;
const MILEAGE_BOX_TOP: f32 = HEADER_Y - 50.0;
const MILEAGE_BOX_WIDTH: f32 = 180.0;
const MILEAGE_BOX_HEIGHT: f32 = 36.0;

pub const SIGNATURE_Y: f32 = MARGIN + 24.0;
const SIGNATURE_WIDTH: f32 = 260.0;

const SECTION_GAP: f32 = 22.0;
const LINE_HEIGHT: f32 = 12.0;
const BODY_SIZE: f32 = 9.0;
/// Roughly what fits on the grid width at the body font size.
const REMARKS_LINE_CHARS: usize = 150;
/// From the last remarks baseline down to the recap baseline.
const BELOW_REMARKS: f32 = SECTION_GAP + 14.0 + LINE_HEIGHT + SECTION_GAP + 14.0;
/// Lowest baseline a remarks line may use so the recap clears the signatures.
const REMARKS_FLOOR: f32 = SIGNATURE_Y + LINE_HEIGHT + BELOW_REMARKS;
const ELLIPSIS: char = '…';

pub const GRID_STROKE: f32 = 0.5;
pub const DUTY_STROKE: f32 = 3.0;

pub const PLACEHOLDER: &str = "N/A";
pub const EMPTY_REMARKS: &str = "—";

/// A duty period as drawn on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetEntry {
    pub activity: ActivityKind,
    pub start_hour: i16,
    pub end_hour: i16,
}

/// Everything needed to draw one sheet. `entries` are ordered by start hour.
#[derive(Debug, Clone)]
pub struct LogSheet {
    pub log: daily_log::Model,
    pub driver_name: String,
    pub entries: Vec<SheetEntry>,
}

/// x coordinate of `hour` on the grid.
pub fn hour_x(hour: f32) -> f32 {
    MARGIN + GRID_WIDTH * hour / 24.0
}

/// y coordinate of the row for `activity`.
pub fn row_y(activity: ActivityKind) -> f32 {
    GRID_TOP - ROW_SPACING * activity.row_index() as f32
}

fn or_placeholder(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Mileage is printed the way it is stored, keeping the decimal point (`120.0`).
fn format_miles(miles: f64) -> String {
    format!("{miles:?}")
}

fn format_hours(hours: Decimal) -> String {
    hours.normalize().to_string()
}

/// Greedy word wrap. Explicit newlines are kept; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Draws the full sheet onto `canvas`.
pub fn draw_log_sheet<C: Canvas + ?Sized>(canvas: &mut C, sheet: &LogSheet) {
    canvas.set_stroke(GRID_STROKE, Rgb::BLACK);

    draw_header(canvas, sheet);
    draw_mileage_boxes(canvas, &sheet.log);
    draw_grid(canvas);
    draw_duty_segments(canvas, &sheet.entries);

    let remarks_end = draw_remarks(canvas, sheet.log.remarks.as_deref(), GRID_BOTTOM - SECTION_GAP);
    let shipping_end = draw_shipping(canvas, &sheet.log, remarks_end - SECTION_GAP);
    draw_recap(canvas, &HourTotals::of_log(&sheet.log), shipping_end - SECTION_GAP);

    draw_signatures(canvas);
}

/// Renders the sheet to PDF bytes.
pub fn render_log_sheet(sheet: &LogSheet) -> Result<Vec<u8>, RenderError> {
    let title = format!("Driver's Daily Log {}", sheet.log.date);
    let mut canvas = PdfCanvas::new(&title, PAGE_WIDTH, PAGE_HEIGHT)?;
    draw_log_sheet(&mut canvas, sheet);
    let bytes = canvas.finish()?;

    debug!(log_id = sheet.log.id, entries = sheet.entries.len(), bytes = bytes.len(), "Rendered log sheet.");
    Ok(bytes)
}

fn draw_header<C: Canvas + ?Sized>(canvas: &mut C, sheet: &LogSheet) {
    let log = &sheet.log;

    canvas.text("DRIVER'S DAILY LOG", 16.0, FontWeight::Bold, MARGIN, HEADER_Y);
    canvas.text(&format!("Date: {}", log.date), 10.0, FontWeight::Regular, MARGIN + 260.0, HEADER_Y);
    canvas.text(
        &format!("Driver: {}", or_placeholder(Some(sheet.driver_name.as_str()))),
        10.0,
        FontWeight::Regular,
        MARGIN + 400.0,
        HEADER_Y,
    );
    canvas.text(
        &format!("Carrier: {}", or_placeholder(log.carrier_name.as_deref())),
        10.0,
        FontWeight::Regular,
        MARGIN + 580.0,
        HEADER_Y,
    );

    let second = HEADER_Y - 18.0;
    canvas.text(
        &format!("From: {}", or_placeholder(Some(log.pickup_location.as_str()))),
        10.0,
        FontWeight::Regular,
        MARGIN,
        second,
    );
    canvas.text(
        &format!("To: {}", or_placeholder(Some(log.dropoff_location.as_str()))),
        10.0,
        FontWeight::Regular,
        MARGIN + 260.0,
        second,
    );
    canvas.text(
        &format!("Manifest #: {}", or_placeholder(log.manifest_number.as_deref())),
        10.0,
        FontWeight::Regular,
        MARGIN + 520.0,
        second,
    );

    let third = HEADER_Y - 34.0;
    canvas.text(
        &format!("Main Office: {}", or_placeholder(log.main_office_address.as_deref())),
        BODY_SIZE,
        FontWeight::Regular,
        MARGIN,
        third,
    );
    canvas.text(
        &format!("Home Terminal: {}", or_placeholder(log.home_terminal_address.as_deref())),
        BODY_SIZE,
        FontWeight::Regular,
        MARGIN + 260.0,
        third,
    );
    canvas.text(
        &format!("Truck/Trailer: {}", or_placeholder(log.trailer_or_plate.as_deref())),
        BODY_SIZE,
        FontWeight::Regular,
        MARGIN + 520.0,
        third,
    );
}

fn draw_mileage_boxes<C: Canvas + ?Sized>(canvas: &mut C, log: &daily_log::Model) {
    let boxes = [
        ("Total Miles Driving Today", log.total_miles_driven, MARGIN),
        ("Total Mileage Today", log.total_mileage_today, MARGIN + MILEAGE_BOX_WIDTH + 20.0),
    ];
    for (label, miles, x) in boxes {
        canvas.rect(x, MILEAGE_BOX_TOP - MILEAGE_BOX_HEIGHT, MILEAGE_BOX_WIDTH, MILEAGE_BOX_HEIGHT);
        canvas.text(label, 8.0, FontWeight::Regular, x + 6.0, MILEAGE_BOX_TOP - 12.0);
        canvas.text(&format_miles(miles), 12.0, FontWeight::Bold, x + 6.0, MILEAGE_BOX_TOP - 28.0);
    }
}

fn draw_grid<C: Canvas + ?Sized>(canvas: &mut C) {
    let left = hour_x(0.0);
    let right = hour_x(24.0);

    for activity in ActivityKind::GRID_ROWS {
        let y = row_y(activity);
        canvas.line((left, y), (right, y));
        canvas.text(activity.label(), 7.0, FontWeight::Regular, left + 2.0, y + 3.0);
    }

    let top = GRID_TOP + GRID_OVERHANG;
    for hour in 0..=24u8 {
        let x = hour_x(f32::from(hour));
        canvas.line((x, top), (x, GRID_BOTTOM));
        let label = match hour {
            0 | 24 => "Mid".to_string(),
            12 => "Noon".to_string(),
            h => h.to_string(),
        };
        canvas.text(&label, 6.0, FontWeight::Regular, x - 4.0, top + 4.0);
    }
}

fn draw_duty_segments<C: Canvas + ?Sized>(canvas: &mut C, entries: &[SheetEntry]) {
    canvas.save_state();
    canvas.set_stroke(DUTY_STROKE, Rgb::DUTY_BLUE);
    for entry in entries {
        let start = f32::from(entry.start_hour.clamp(0, 24));
        let end = f32::from(entry.end_hour.clamp(0, 24));
        let y = row_y(entry.activity);
        canvas.line((hour_x(start), y), (hour_x(end), y));
    }
    canvas.restore_state();
}

/// Drops lines past `max_lines`, marking the last kept line with an ellipsis.
fn clamp_lines(mut lines: Vec<String>, max_lines: usize, max_chars: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        if last.chars().count() >= max_chars {
            last.pop();
        }
        last.push(ELLIPSIS);
    }
    lines
}

/// Returns the baseline of the last line drawn.
///
/// Remarks stop above [`REMARKS_FLOOR`]; anything longer is cut with an ellipsis.
fn draw_remarks<C: Canvas + ?Sized>(canvas: &mut C, remarks: Option<&str>, top: f32) -> f32 {
    canvas.text("Remarks:", 10.0, FontWeight::Bold, MARGIN, top);

    let first_y = top - 14.0;
    let max_lines = ((first_y - REMARKS_FLOOR) / LINE_HEIGHT).floor().max(0.0) as usize + 1;
    let lines = match remarks.map(str::trim) {
        Some(text) if !text.is_empty() => {
            let wrapped = wrap_text(text, REMARKS_LINE_CHARS);
            if wrapped.len() > max_lines {
                debug!(lines = wrapped.len(), max_lines, "Truncating remarks to fit the sheet.");
            }
            clamp_lines(wrapped, max_lines, REMARKS_LINE_CHARS)
        }
        _ => vec![EMPTY_REMARKS.to_string()],
    };

    let mut y = first_y;
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            y -= LINE_HEIGHT;
        }
        canvas.text(line, BODY_SIZE, FontWeight::Regular, MARGIN + 10.0, y);
    }
    y
}

fn draw_shipping<C: Canvas + ?Sized>(canvas: &mut C, log: &daily_log::Model, top: f32) -> f32 {
    canvas.text("Shipping Documents:", 10.0, FontWeight::Bold, MARGIN, top);
    let manifest_y = top - 14.0;
    canvas.text(
        &format!("DVL or Manifest No.: {}", or_placeholder(log.manifest_number.as_deref())),
        BODY_SIZE,
        FontWeight::Regular,
        MARGIN + 10.0,
        manifest_y,
    );
    let shipper_y = manifest_y - LINE_HEIGHT;
    canvas.text(
        &format!("Shipper & Commodity: {}", or_placeholder(log.shipper_and_commodity.as_deref())),
        BODY_SIZE,
        FontWeight::Regular,
        MARGIN + 10.0,
        shipper_y,
    );
    shipper_y
}

fn draw_recap<C: Canvas + ?Sized>(canvas: &mut C, totals: &HourTotals, top: f32) {
    canvas.text("Recap:", 10.0, FontWeight::Bold, MARGIN, top);
    // 7-day total and next-day availability need the driver's cycle history,
    // which the sheet does not have; both stay placeholders.
    let recap = format!(
        "Total hours today: {}    Total last 7 days: {}    Available tomorrow: {}",
        format_hours(totals.recap_hours()),
        PLACEHOLDER,
        PLACEHOLDER
    );
    canvas.text(&recap, BODY_SIZE, FontWeight::Regular, MARGIN + 10.0, top - 14.0);
}

fn draw_signatures<C: Canvas + ?Sized>(canvas: &mut C) {
    let slots = [
        ("Driver's Signature", MARGIN),
        ("Reviewed By (Carrier Representative)", PAGE_WIDTH - MARGIN - SIGNATURE_WIDTH),
    ];
    for (label, x) in slots {
        canvas.line((x, SIGNATURE_Y), (x + SIGNATURE_WIDTH, SIGNATURE_Y));
        canvas.text(label, 8.0, FontWeight::Regular, x, SIGNATURE_Y - 12.0);
    }
}
