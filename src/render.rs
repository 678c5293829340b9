use crate::config::Config;
use crate::global::{BAR_SEGMENTS, BLUE_SEGMENTS, PURPLE_SEGMENTS};
use crate::roll::Outcome;
use crate::session::SessionState;
use log::debug;
use std::path::Path;
use thiserror::Error;

/// Most bonus segments a bar can hold.
pub const MAX_ADDITIONAL: u8 = (BAR_SEGMENTS - BLUE_SEGMENTS - PURPLE_SEGMENTS) as u8;

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("additional {0} out of range")]
    AdditionalOutOfRange(u8),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    Blue,
    Purple,
    Gold,
    Empty,
}

impl Segment {
    fn class(self) -> &'static str {
        match self {
            Segment::Blue => "blue",
            Segment::Purple => "purple",
            Segment::Gold => "gold",
            Segment::Empty => "empty",
        }
    }

    fn glyph(self) -> char {
        match self {
            Segment::Blue => '#',
            Segment::Purple => '=',
            Segment::Gold => '*',
            Segment::Empty => '.',
        }
    }
}

/// One labeled stat bar: 4 blue, 4 purple, `additional` gold, the rest empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Card<'a> {
    title: &'a str,
    stat_name: &'a str,
    stat_value: u32,
    additional: u8,
}

impl<'a> Card<'a> {
    pub fn new(
        title: &'a str,
        stat_name: &'a str,
        stat_value: u32,
        additional: u8,
    ) -> Result<Self, RenderError> {
        if additional > MAX_ADDITIONAL {
            return Err(RenderError::AdditionalOutOfRange(additional));
        }
        Ok(Self {
            title,
            stat_name,
            stat_value,
            additional,
        })
    }

    /// The bar for an outcome, which fills one bonus segment per point.
    pub fn for_outcome(
        title: &'a str,
        stat_name: &'a str,
        stat_value: u32,
        outcome: Outcome,
    ) -> Result<Self, RenderError> {
        Card::new(title, stat_name, stat_value, outcome.value())
    }

    pub fn segments(&self) -> [Segment; BAR_SEGMENTS] {
        let mut segs = [Segment::Empty; BAR_SEGMENTS];
        let purple_end = BLUE_SEGMENTS + PURPLE_SEGMENTS;
        let gold_end = purple_end + self.additional as usize;
        for (i, s) in segs.iter_mut().enumerate() {
            *s = if i < BLUE_SEGMENTS {
                Segment::Blue
            } else if i < purple_end {
                Segment::Purple
            } else if i < gold_end {
                Segment::Gold
            } else {
                Segment::Empty
            };
        }
        segs
    }

    pub fn filled(&self) -> usize {
        BLUE_SEGMENTS + PURPLE_SEGMENTS + self.additional as usize
    }

    pub fn denominator(&self) -> usize {
        self.filled()
    }

    pub fn is_max(&self) -> bool {
        self.additional == MAX_ADDITIONAL
    }

    pub fn to_text(&self) -> String {
        let bar: String = self.segments().iter().map(|s| s.glyph()).collect();
        format!(
            "{}\n  {}  {}/{}  [{}]\n",
            self.title,
            self.stat_name,
            self.stat_value,
            self.denominator(),
            bar
        )
    }

    pub fn to_html(&self) -> String {
        let bar: String = self
            .segments()
            .iter()
            .map(|s| format!(r#"<div class="seg {}"></div>"#, s.class()))
            .collect();
        format!(
            concat!(
                r#"<div class="card">"#,
                r#"<div class="card-title">{}</div>"#,
                r#"<div class="row">"#,
                r#"<div class="stat-label">{}</div>"#,
                r#"<div class="stat-value">{}<span>/{}</span></div>"#,
                r#"<div class="bar">{}</div>"#,
                "</div></div>\n"
            ),
            escape(self.title),
            escape(self.stat_name),
            self.stat_value,
            self.denominator(),
            bar
        )
    }
}

/// The whole simulator screen for one session.
pub struct Page<'a> {
    config: &'a Config,
    state: SessionState,
}

impl<'a> Page<'a> {
    pub fn new(config: &'a Config, state: SessionState) -> Self {
        Self { config, state }
    }

    fn cards(&self) -> Result<(Card<'a>, Card<'a>), RenderError> {
        let c = self.config;
        Ok((
            Card::for_outcome(
                &c.previous_title,
                &c.stat_name,
                c.stat_value,
                self.state.displayed_previous(),
            )?,
            Card::for_outcome(
                &c.current_title,
                &c.stat_name,
                c.stat_value,
                self.state.current(),
            )?,
        ))
    }

    /// The image to show, if one is configured and present.
    fn image(&self) -> Option<&'a Path> {
        let path = self.config.image.as_deref()?;
        if path.is_file() {
            Some(path)
        } else {
            debug!("Skipping missing image {}", path.display());
            None
        }
    }

    pub fn to_text(&self) -> Result<String, RenderError> {
        let (prev, cur) = self.cards()?;
        let mut out = format!(
            "/ {} /\n{}\n\n",
            self.config.page_title, self.config.subtitle
        );
        out += &prev.to_text();
        out += "----------------------------------------\n";
        out += &cur.to_text();
        if cur.is_max() {
            out += &format!("\n{}\n", self.config.badge);
        }
        out += &format!("\n[{}]\n", self.config.button);
        Ok(out)
    }

    pub fn to_html(&self) -> Result<String, RenderError> {
        let (prev, cur) = self.cards()?;
        let mut out = String::new();
        out += &format!(
            concat!(
                r#"<div class="title-wrap">"#,
                r#"<div class="title-line"><span>/</span><span>{}</span><span>/</span></div>"#,
                r#"<div class="subtitle">{}</div>"#,
                "</div>\n"
            ),
            escape(&self.config.page_title),
            escape(&self.config.subtitle)
        );
        if let Some(path) = self.image() {
            out += &format!(
                "<div class=\"img-wrap\"><img src=\"{}\" width=\"210\"></div>\n",
                escape(&path.to_string_lossy())
            );
        }
        out += &prev.to_html();
        out += "<div class=\"divider\"></div>\n";
        out += &cur.to_html();
        if cur.is_max() {
            out += &format!("<div class=\"badge\">{}</div>\n", escape(&self.config.badge));
        }
        out += &format!(
            "<form method=\"post\"><button name=\"action\" value=\"reroll\">{}</button></form>\n",
            escape(&self.config.button)
        );
        Ok(out)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
