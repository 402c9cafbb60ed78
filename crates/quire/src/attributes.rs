//! Attributes of markup elements and their typed readers.
//!
//! Only the attributes listed in [`quire_attr`] are ever read by the importer,
//! so anything else on an element is dropped.

use std::sync::OnceLock;

use ecow::{EcoString, eco_format};
use log::warn;
use regex::Regex;

use crate::ir::{MAX_COLSPAN, MAX_ROWSPAN, Stroke, Video, VideoProvider};

/// Attribute names read by the importer.
pub mod quire_attr {
    macro_rules! attrs {
        ($($attr:ident -> $name:literal)*) => {
            $(#[allow(non_upper_case_globals, missing_docs)]
            pub const $attr: &str = $name;)*
        }
    }

    attrs! {
        alt -> "alt"
        aria_level -> "aria-level"
        checked -> "checked"
        class -> "class"
        color -> "color"
        colspan -> "colspan"
        data_checked -> "data-checked"
        data_color -> "data-color"
        data_id -> "data-id"
        data_kind -> "data-kind"
        data_label -> "data-label"
        data_latex -> "data-latex"
        data_level -> "data-level"
        data_list -> "data-list"
        data_name -> "data-name"
        data_provider -> "data-provider"
        data_shortcode -> "data-shortcode"
        data_strokes -> "data-strokes"
        data_type -> "data-type"
        data_youtube_video -> "data-youtube-video"
        face -> "face"
        href -> "href"
        id -> "id"
        open -> "open"
        rowspan -> "rowspan"
        src -> "src"
        start -> "start"
        style -> "style"
        target -> "target"
        title -> "title"
        type_ -> "type"
        value -> "value"
    }
}

/// Attributes of one element, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attrs(pub Vec<(EcoString, EcoString)>);

impl Attrs {
    pub fn get(&self, name: &str) -> Option<&EcoString> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Reads and converts one attribute, ignoring unparsable values.
    pub fn parse<T: AttrParser>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| T::parse_attr(value.trim()))
    }

    /// The `data-type` attribute.
    pub fn data_type(&self) -> Option<&str> {
        self.get(quire_attr::data_type).map(|value| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get(quire_attr::class)
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get(quire_attr::class)
            .map(|classes| classes.split_ascii_whitespace())
            .into_iter()
            .flatten()
    }
}

pub trait AttrsParser {
    fn parse(attrs: &Attrs) -> Self
    where
        Self: Sized;
}

pub trait AttrParser {
    fn parse_attr(content: &str) -> Option<Self>
    where
        Self: Sized;
}

impl AttrParser for i64 {
    fn parse_attr(content: &str) -> Option<Self> {
        content.parse().ok()
    }
}

impl AttrParser for usize {
    /// Digit runs too long for `usize` saturate.
    fn parse_attr(content: &str) -> Option<Self> {
        let content = content.trim();
        content.parse().ok().or_else(|| {
            (!content.is_empty() && content.bytes().all(|b| b.is_ascii_digit()))
                .then_some(usize::MAX)
        })
    }
}

impl AttrParser for bool {
    fn parse_attr(content: &str) -> Option<Self> {
        match content.to_ascii_lowercase().as_str() {
            "" | "true" | "checked" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

impl AttrParser for EcoString {
    fn parse_attr(content: &str) -> Option<Self> {
        Some(content.into())
    }
}

#[derive(Default)]
pub struct HeadingAttr {
    /// Explicit level override, not yet clamped.
    pub level: Option<i64>,
}

impl AttrsParser for HeadingAttr {
    fn parse(attrs: &Attrs) -> Self {
        Self {
            level: attrs
                .parse(quire_attr::data_level)
                .or_else(|| attrs.parse(quire_attr::aria_level)),
        }
    }
}

#[derive(Default)]
pub struct ListAttr {
    pub task: bool,
    pub start: Option<i64>,
}

impl AttrsParser for ListAttr {
    fn parse(attrs: &Attrs) -> Self {
        Self {
            task: attrs.data_type() == Some("taskList") || attrs.has_class("contains-task-list"),
            start: attrs.parse(quire_attr::start),
        }
    }
}

/// What kind of list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Bullet,
    Ordered,
    Task,
}

#[derive(Default)]
pub struct ItemAttr {
    pub checked: Option<bool>,
    pub task: bool,
    pub ordered: bool,
}

impl ItemAttr {
    /// The list kind an orphaned item is grouped into.
    pub fn kind(&self) -> ItemKind {
        if self.task {
            ItemKind::Task
        } else if self.ordered {
            ItemKind::Ordered
        } else {
            ItemKind::Bullet
        }
    }
}

impl AttrsParser for ItemAttr {
    fn parse(attrs: &Attrs) -> Self {
        let checked = attrs.parse(quire_attr::data_checked);
        Self {
            checked,
            task: checked.is_some()
                || attrs.data_type() == Some("taskItem")
                || attrs.has_class("task-list-item"),
            ordered: attrs
                .get(quire_attr::data_list)
                .is_some_and(|list| list.as_str() == "ordered")
                || attrs.has(quire_attr::value),
        }
    }
}

#[derive(Default)]
pub struct LinkAttr {
    pub href: EcoString,
    pub target: Option<EcoString>,
}

impl AttrsParser for LinkAttr {
    fn parse(attrs: &Attrs) -> Self {
        Self {
            href: attrs.get(quire_attr::href).cloned().unwrap_or_default(),
            target: attrs.get(quire_attr::target).cloned(),
        }
    }
}

#[derive(Default)]
pub struct ImageAttr {
    pub src: EcoString,
    pub alt: EcoString,
    pub title: Option<EcoString>,
}

impl AttrsParser for ImageAttr {
    fn parse(attrs: &Attrs) -> Self {
        Self {
            src: attrs.get(quire_attr::src).cloned().unwrap_or_default(),
            alt: attrs.get(quire_attr::alt).cloned().unwrap_or_default(),
            title: attrs
                .get(quire_attr::title)
                .filter(|title| !title.is_empty())
                .cloned(),
        }
    }
}

pub struct CellAttr {
    pub colspan: usize,
    pub rowspan: usize,
}

impl AttrsParser for CellAttr {
    fn parse(attrs: &Attrs) -> Self {
        Self {
            colspan: attrs
                .parse(quire_attr::colspan)
                .unwrap_or(1)
                .clamp(1, MAX_COLSPAN),
            rowspan: attrs
                .parse(quire_attr::rowspan)
                .unwrap_or(1)
                .clamp(1, MAX_ROWSPAN),
        }
    }
}

#[derive(Default)]
pub struct CodeAttr {
    pub language: Option<EcoString>,
}

impl AttrsParser for CodeAttr {
    fn parse(attrs: &Attrs) -> Self {
        let language = attrs.classes().find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .filter(|lang| !lang.is_empty())
                .map(EcoString::from)
        });
        Self { language }
    }
}

#[derive(Default)]
pub struct MentionAttr {
    pub user: bool,
    pub id: EcoString,
    pub label: EcoString,
}

impl AttrsParser for MentionAttr {
    fn parse(attrs: &Attrs) -> Self {
        let id = attrs.get(quire_attr::data_id).cloned().unwrap_or_default();
        Self {
            user: attrs
                .get(quire_attr::data_kind)
                .is_none_or(|kind| kind.as_str() != "tag"),
            label: attrs
                .get(quire_attr::data_label)
                .cloned()
                .unwrap_or_else(|| id.clone()),
            id,
        }
    }
}

/// Parses the JSON stroke list of a drawing canvas. Invalid payloads yield no
/// strokes.
pub fn parse_strokes(payload: Option<&str>) -> Vec<Stroke> {
    let Some(payload) = payload.map(str::trim).filter(|p| !p.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str(payload) {
        Ok(strokes) => strokes,
        Err(err) => {
            warn!("canvas: ignoring invalid stroke payload: {err}");
            Vec::new()
        }
    }
}

/// Derives a video from an embed or page URL.
pub fn parse_video_url(url: &str) -> Video {
    static YOUTUBE: OnceLock<Regex> = OnceLock::new();
    static VIMEO: OnceLock<Regex> = OnceLock::new();
    let youtube = YOUTUBE.get_or_init(|| {
        Regex::new(
            r"(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|v/)|youtu\.be/)([A-Za-z0-9_-]{6,})",
        )
        .expect("youtube pattern is valid")
    });
    let vimeo = VIMEO.get_or_init(|| {
        Regex::new(r"vimeo\.com/(?:video/|channels/[^/]+/)?(\d+)").expect("vimeo pattern is valid")
    });

    if let Some(caps) = youtube.captures(url) {
        return Video {
            provider: VideoProvider::Youtube,
            id: caps[1].into(),
        };
    }
    if let Some(caps) = vimeo.captures(url) {
        return Video {
            provider: VideoProvider::Vimeo,
            id: caps[1].into(),
        };
    }
    Video {
        provider: VideoProvider::Other,
        id: url.trim().into(),
    }
}

/// Style declarations that carry mark semantics.
#[derive(Debug, Default, PartialEq)]
pub struct StyleAttr {
    pub color: Option<EcoString>,
    pub background: Option<EcoString>,
    pub font_family: Option<EcoString>,
    pub bold: Option<bool>,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub subscript: bool,
    pub superscript: bool,
}

impl AttrsParser for StyleAttr {
    fn parse(attrs: &Attrs) -> Self {
        attrs
            .get(quire_attr::style)
            .map(|style| parse_style(style))
            .unwrap_or_default()
    }
}

/// Reads the declarations of an inline `style` attribute.
pub fn parse_style(style: &str) -> StyleAttr {
    let mut out = StyleAttr::default();
    for decl in style.split(';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim().trim_end_matches("!important").trim();
        let lower = value.to_ascii_lowercase();
        match prop.as_str() {
            "color" => out.color = normalize_color(value),
            "background" | "background-color" => out.background = normalize_color(value),
            "font-family" => {
                out.font_family = value
                    .split(',')
                    .next()
                    .map(|family| family.trim().trim_matches(['"', '\'']).trim())
                    .filter(|family| !family.is_empty())
                    .map(EcoString::from);
            }
            "font-weight" => {
                out.bold = Some(match lower.as_str() {
                    "bold" | "bolder" => true,
                    weight => weight.parse::<u16>().is_ok_and(|w| w >= 600),
                });
            }
            "font-style" => out.italic = lower == "italic" || lower == "oblique",
            "text-decoration" | "text-decoration-line" => {
                out.underline = lower.contains("underline");
                out.strike = lower.contains("line-through");
            }
            "vertical-align" => {
                out.subscript = lower == "sub";
                out.superscript = lower == "super";
            }
            _ => {}
        }
    }
    out
}

/// Normalizes a CSS color to lowercase `#rrggbb`, or a lowercase keyword when
/// it names no known color. Transparent and empty values yield `None`.
pub fn normalize_color(value: &str) -> Option<EcoString> {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() || value == "transparent" || value == "inherit" || value == "initial" {
        return None;
    }

    if let Some(hex) = value.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 | 4 => {
                let mut out = EcoString::from("#");
                for c in hex.chars().take(3) {
                    out.push(c);
                    out.push(c);
                }
                Some(out)
            }
            6 | 8 => Some(eco_format!("#{}", &hex[..6])),
            _ => None,
        };
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = args
            .split([',', ' ', '/'])
            .filter(|part| !part.is_empty())
            .collect();
        if parts.len() == 4 && parts[3].trim().parse::<f32>().is_ok_and(|alpha| alpha == 0.0) {
            return None;
        }
        let channels: Option<Vec<u8>> = parts
            .iter()
            .take(3)
            .map(|part| part.trim().parse::<f32>().ok().map(|c| c.clamp(0.0, 255.0) as u8))
            .collect();
        return match channels.as_deref() {
            Some([r, g, b]) => Some(eco_format!("#{r:02x}{g:02x}{b:02x}")),
            _ => None,
        };
    }

    let named = match value.as_str() {
        "black" => "#000000",
        "white" => "#ffffff",
        "red" => "#ff0000",
        "green" => "#008000",
        "lime" => "#00ff00",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "cyan" | "aqua" => "#00ffff",
        "magenta" | "fuchsia" => "#ff00ff",
        "gray" | "grey" => "#808080",
        "orange" => "#ffa500",
        "purple" => "#800080",
        _ => return Some(value.into()),
    };
    Some(named.into())
}

/// Background colors produced by document import tools, mapped to the
/// editor's highlight colors. `None` is the default (yellow) highlight.
const HIGHLIGHT_TABLE: &[(&str, Option<&str>)] = &[
    ("#ffff00", None),
    ("#fff2cc", None),
    ("#fef08a", None),
    ("#fef9c3", None),
    ("#ff0000", Some("red")),
    ("#f4cccc", Some("red")),
    ("#ea9999", Some("red")),
    ("#fecaca", Some("red")),
    ("#fee2e2", Some("red")),
    ("#ffc7ce", Some("red")),
    ("#0000ff", Some("blue")),
    ("#00ffff", Some("blue")),
    ("#cfe2f3", Some("blue")),
    ("#c9daf8", Some("blue")),
    ("#bfdbfe", Some("blue")),
    ("#dbeafe", Some("blue")),
    ("#00ff00", Some("green")),
    ("#008000", Some("green")),
    ("#d9ead3", Some("green")),
    ("#b6d7a8", Some("green")),
    ("#bbf7d0", Some("green")),
    ("#dcfce7", Some("green")),
    ("#c6efce", Some("green")),
];

/// Maps a normalized background color to a highlight color, `None` being the
/// default highlight.
pub fn semantic_highlight(color: &str) -> Option<EcoString> {
    match HIGHLIGHT_TABLE.iter().find(|(key, _)| *key == color) {
        Some((_, semantic)) => semantic.map(EcoString::from),
        None => Some(color.into()),
    }
}

/// Reads a `highlight-*` class, returning the highlight color it names.
pub fn highlight_class(attrs: &Attrs) -> Option<Option<EcoString>> {
    attrs.classes().find_map(|class| {
        match class.strip_prefix("highlight-")? {
            "red" | "blue" | "green" => Some(Some(class["highlight-".len()..].into())),
            "yellow" | "default" => Some(None),
            _ => None,
        }
    })
}
