//! Show file parser and sequence table
//!
//! File format: one header line followed by one line per step, fields
//! separated by `;`.
//!
//! ```text
//! turret;cockpit;front;landingGearAndRamp;drive-red-0;drive-green-0;drive-blue-0;...
//! 255;0;128;255;100;50;25;...
//! ```
//!
//! The strip length `K` is the number of `drive-red-*` header columns and
//! every data line carries exactly `4 + 3K` integers. Scalar channels are
//! stored as 0-255 and normalized to `[0.0, 1.0]`; drive components are
//! kept raw.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use embassy_time::Duration;
use falcon_hal::Rgb;

use super::step::SequenceStep;
use crate::error::{MalformedKind, MalformedSequenceError};
use crate::traits::Channel;

/// Scalar columns, in the order they must open the header
pub const SCALAR_COLUMNS: [&str; 4] = [
    Channel::Turret.column_name(),
    Channel::Cockpit.column_name(),
    Channel::Front.column_name(),
    Channel::LandingGearAndRamp.column_name(),
];

/// Header column prefixes of one strip pixel, followed by the pixel index
pub const DRIVE_PREFIXES: [&str; 3] = ["drive-red-", "drive-green-", "drive-blue-"];

const FIELD_SEPARATOR: char = ';';
const MAX_COMPONENT: u32 = 255;

/// Immutable, validated show
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceTable {
    steps: Vec<SequenceStep>,
    drive_led_count: usize,
}

impl SequenceTable {
    /// Parse a show file
    pub fn parse(text: &str) -> Result<Self, MalformedSequenceError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or(MalformedSequenceError::new(0, MalformedKind::MissingHeader))?;
        let drive_led_count = parse_header(header)
            .map_err(|kind| MalformedSequenceError::new(header_line, kind))?;

        let mut steps = Vec::new();
        for (line_no, line) in lines {
            let step = parse_row(line, drive_led_count)
                .map_err(|kind| MalformedSequenceError::new(line_no, kind))?;
            steps.push(step);
        }

        tracing::debug!(
            steps = steps.len(),
            drive_led_count,
            "parsed sequence table"
        );

        Ok(Self {
            steps,
            drive_led_count,
        })
    }

    /// Read and parse a show file
    #[cfg(feature = "std")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            steps = table.len(),
            drive_led_count = table.drive_led_count(),
            "loaded sequence"
        );
        Ok(table)
    }

    /// Build a table from steps, checking the pixel count of each
    pub fn from_steps(
        drive_led_count: usize,
        steps: Vec<SequenceStep>,
    ) -> Result<Self, MalformedSequenceError> {
        for (index, step) in steps.iter().enumerate() {
            if step.drive_pixels.len() != drive_led_count {
                return Err(MalformedSequenceError::new(
                    index + 2,
                    MalformedKind::FieldCount {
                        expected: expected_fields(drive_led_count),
                        found: expected_fields(step.drive_pixels.len()),
                    },
                ));
            }
            if let Some(column) = step
                .scalars()
                .iter()
                .position(|v| !(0.0..=1.0).contains(v))
            {
                return Err(MalformedSequenceError::new(
                    index + 2,
                    MalformedKind::ScalarOutOfRange { column },
                ));
            }
        }
        Ok(Self {
            steps,
            drive_led_count,
        })
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the show has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`
    pub fn get(&self, index: usize) -> Option<&SequenceStep> {
        self.steps.get(index)
    }

    /// All steps in playback order
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    /// Strip length declared by the header
    pub fn drive_led_count(&self) -> usize {
        self.drive_led_count
    }

    /// Total show length for a given step duration
    pub fn duration(&self, step_duration_ms: u32) -> Duration {
        Duration::from_millis(self.steps.len() as u64 * u64::from(step_duration_ms))
    }

    /// Serialize back to the file format
    ///
    /// Scalars are scaled by 255 and rounded, the inverse of parsing.
    pub fn to_text(&self) -> String {
        let mut out = header_for(self.drive_led_count);
        out.push('\n');
        for step in &self.steps {
            let mut first = true;
            for value in step.scalars() {
                if !first {
                    out.push(FIELD_SEPARATOR);
                }
                first = false;
                let raw = libm::roundf(value * MAX_COMPONENT as f32) as u32;
                let _ = write!(out, "{raw}");
            }
            for pixel in &step.drive_pixels {
                let _ = write!(out, ";{};{};{}", pixel.r, pixel.g, pixel.b);
            }
            out.push('\n');
        }
        out
    }
}

/// Canonical header for a strip of `drive_led_count` pixels
pub fn header_for(drive_led_count: usize) -> String {
    let mut header = String::new();
    header.push_str(&SCALAR_COLUMNS.join(";"));
    for i in 0..drive_led_count {
        let _ = write!(header, ";drive-red-{i};drive-green-{i};drive-blue-{i}");
    }
    header
}

const fn expected_fields(drive_led_count: usize) -> usize {
    SCALAR_COLUMNS.len() + 3 * drive_led_count
}

/// Validate the header and return the declared strip length
///
/// After the scalar columns only complete `drive-red-i;drive-green-i;drive-blue-i`
/// triples are accepted, numbered from 0.
fn parse_header(header: &str) -> Result<usize, MalformedKind> {
    let header = header.strip_suffix(FIELD_SEPARATOR).unwrap_or(header);
    let columns: Vec<&str> = header.split(FIELD_SEPARATOR).map(str::trim).collect();

    if columns.len() < SCALAR_COLUMNS.len()
        || columns
            .iter()
            .zip(SCALAR_COLUMNS.iter())
            .any(|(found, expected)| found != expected)
    {
        return Err(MalformedKind::BadHeader);
    }

    let drive = &columns[SCALAR_COLUMNS.len()..];
    if drive.len() % 3 != 0 {
        return Err(MalformedKind::BadHeader);
    }
    for (i, triple) in drive.chunks_exact(3).enumerate() {
        let in_order = triple.iter().zip(DRIVE_PREFIXES).all(|(column, prefix)| {
            column
                .strip_prefix(prefix)
                .and_then(parse_digits)
                .is_some_and(|index| index as usize == i)
        });
        if !in_order {
            return Err(MalformedKind::BadHeader);
        }
    }

    Ok(drive.len() / 3)
}

/// Parse a field made of ASCII digits only (no sign, no spaces inside)
fn parse_digits(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Decode one data line
fn parse_row(line: &str, drive_led_count: usize) -> Result<SequenceStep, MalformedKind> {
    // A single trailing separator is tolerated
    let line = line.strip_suffix(FIELD_SEPARATOR).unwrap_or(line);
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();

    let expected = expected_fields(drive_led_count);
    if fields.len() != expected {
        return Err(MalformedKind::FieldCount {
            expected,
            found: fields.len(),
        });
    }

    let mut values = Vec::with_capacity(expected);
    for (column, field) in fields.iter().enumerate() {
        let value =
            parse_digits(field).ok_or(MalformedKind::InvalidField { column })?;
        if value > MAX_COMPONENT {
            return Err(if column < SCALAR_COLUMNS.len() {
                MalformedKind::ScalarOutOfRange { column }
            } else {
                MalformedKind::PixelOutOfRange { column }
            });
        }
        values.push(value as u8);
    }

    let (scalars, drive) = values.split_at(SCALAR_COLUMNS.len());
    let mut normalized = [0.0f32; 4];
    for (slot, raw) in normalized.iter_mut().zip(scalars) {
        *slot = f32::from(*raw) / MAX_COMPONENT as f32;
    }
    let drive_pixels = drive
        .chunks_exact(3)
        .map(|c| Rgb::new(c[0], c[1], c[2]))
        .collect();

    Ok(SequenceStep::new(normalized, drive_pixels))
}
