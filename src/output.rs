use crate::merge::Template;
use crate::parser::ParseResult;
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            other => Err(format!("unknown format: {other} (expected csv, json or text)")),
        }
    }
}

#[derive(Debug, Serialize)]
struct TemplateRow<'a> {
    template_id: usize,
    template: &'a str,
    count: usize,
    event_ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct EventRow<'a> {
    line_id: usize,
    event_id: &'a str,
    template_id: Option<usize>,
    content: &'a str,
}

/// Templates by descending count, ties by ID. Presentation only.
pub fn sorted_by_count(templates: &[Template]) -> Vec<&Template> {
    let mut out: Vec<&Template> = templates.iter().collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.template_id.cmp(&b.template_id)));
    out
}

pub fn write_templates<W: Write>(
    w: W,
    templates: &[&Template],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut cw = csv::Writer::from_writer(w);
            cw.write_record(["TemplateID", "Template", "Count"])?;
            for t in templates {
                cw.write_record([t.template_id.to_string(), t.template.clone(), t.count.to_string()])?;
            }
            cw.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<TemplateRow> = templates
                .iter()
                .map(|t| TemplateRow {
                    template_id: t.template_id,
                    template: &t.template,
                    count: t.count,
                    event_ids: &t.event_ids,
                })
                .collect();
            write_json(w, &rows)?;
        }
        OutputFormat::Text => {
            let mut w = w;
            for t in templates {
                writeln!(w, "({} events) {}", t.count, t.template)?;
            }
            w.flush()?;
        }
    }
    Ok(())
}

pub fn write_events<W: Write>(w: W, result: &ParseResult, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut cw = csv::Writer::from_writer(w);
            cw.write_record(["LineID", "EventID", "TemplateID", "Content"])?;
            for ev in &result.events {
                cw.write_record([
                    ev.line_id.to_string(),
                    ev.event_id.clone(),
                    ev.template_id.map(|id| id.to_string()).unwrap_or_default(),
                    ev.raw_content.clone(),
                ])?;
            }
            cw.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<EventRow> = result
                .events
                .iter()
                .map(|ev| EventRow {
                    line_id: ev.line_id,
                    event_id: &ev.event_id,
                    template_id: ev.template_id,
                    content: &ev.raw_content,
                })
                .collect();
            write_json(w, &rows)?;
        }
        OutputFormat::Text => {
            let mut w = w;
            for ev in &result.events {
                let id = ev.template_id.map(|id| id.to_string()).unwrap_or_default();
                writeln!(w, "{}\t{}\t{}", ev.line_id, id, ev.raw_content)?;
            }
            w.flush()?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(mut w: W, rows: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut w, rows)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}
