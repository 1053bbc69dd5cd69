//! Channel video selection

use super::prompt::Prompter;
use crate::core::VideoMetadata;
use crate::error::SwitchdlError;
use std::collections::HashSet;

/// Parse a selection expression into zero-based indices.
///
/// Accepts `a`/`all`, or comma-separated 1-based indices and inclusive
/// `start-end` ranges. Duplicates are dropped keeping first-seen order.
/// Any malformed or out-of-range token rejects the whole expression.
pub fn parse_selection(selection: &str, len: usize) -> Result<Vec<usize>, SwitchdlError> {
    let selection = selection.trim();
    if selection.eq_ignore_ascii_case("a") || selection.eq_ignore_ascii_case("all") {
        return Ok((0..len).collect());
    }

    let mut indices = Vec::new();
    let mut seen = HashSet::new();
    for part in selection.split(',') {
        for index in parse_selection_part(part.trim(), len)? {
            if seen.insert(index) {
                indices.push(index);
            }
        }
    }
    Ok(indices)
}

fn parse_selection_part(part: &str, len: usize) -> Result<Vec<usize>, SwitchdlError> {
    if part.contains('-') {
        let bounds: Vec<&str> = part.split('-').collect();
        if bounds.len() != 2 {
            return Err(invalid(format!("invalid range format: {}", part)));
        }
        let start = bounds[0].trim().parse::<usize>();
        let end = bounds[1].trim().parse::<usize>();
        return match (start, end) {
            (Ok(start), Ok(end)) if start >= 1 && end <= len && start <= end => {
                Ok((start - 1..end).collect())
            }
            _ => Err(invalid(format!("invalid range: {}", part))),
        };
    }

    match part.parse::<usize>() {
        Ok(index) if index >= 1 && index <= len => Ok(vec![index - 1]),
        _ => Err(invalid(format!("invalid video number: {}", part))),
    }
}

fn invalid(message: String) -> SwitchdlError {
    SwitchdlError::Validation(message)
}

/// Table of videos: index, title, duration and publish date
pub fn render_video_table(videos: &[VideoMetadata]) -> Vec<String> {
    let rows: Vec<[String; 4]> = videos
        .iter()
        .enumerate()
        .map(|(i, v)| {
            [
                (i + 1).to_string(),
                v.title.clone(),
                v.formatted_duration(),
                v.formatted_date(),
            ]
        })
        .collect();

    let header = ["Index", "Title", "Duration", "Date"].map(str::to_string);
    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String; 4]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("   ")
            .trim_end()
            .to_string()
    };

    let separator = widths.map(|w| "─".repeat(w));
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&header));
    lines.push(format_row(&separator));
    lines.extend(rows.iter().map(format_row));
    lines
}

/// Show the video table and ask which videos to download
pub fn select_videos_interactively(
    videos: &[VideoMetadata],
    prompter: &mut dyn Prompter,
) -> Result<Vec<VideoMetadata>, SwitchdlError> {
    prompter.say("");
    prompter.say("Available videos:");
    for line in render_video_table(videos) {
        prompter.say(&line);
    }

    loop {
        let selection = prompter.ask("Select videos (1,3-5,8,...) or 'a'/'all' for all: ")?;
        if selection.is_empty() {
            prompter.say("Input cannot be empty. Please enter 'a'/'all' or a valid selection.");
            continue;
        }

        match parse_selection(&selection, videos.len()) {
            Ok(indices) => return Ok(indices.into_iter().map(|i| videos[i].clone()).collect()),
            Err(e) => prompter.say(&format!("Invalid selection: {}. Try again.", e)),
        }
    }
}
