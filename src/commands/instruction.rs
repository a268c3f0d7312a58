//! Instruction records.
//!
//! Each instruction serializes to the flat map the printer SDK consumes: one
//! discriminator key naming the command (`appendBitmap`, `openCashDrawer`,
//! ...) plus camelCase parameters. Optional parameters that are unset are
//! left out of the map entirely.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::protocol::{Alignment, CutPaperAction, Encoding, Rotation};

/// Default bitmap print width in dots (80mm paper at 203 DPI).
pub const DEFAULT_BITMAP_WIDTH: u32 = 576;

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    DEFAULT_BITMAP_WIDTH
}

/// What kind of instruction a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    SetEncoding,
    CutPaper,
    OpenDrawer,
    BitmapFromPath,
    BitmapFromBytes,
    BitmapFromText,
    Text,
    LineFeed,
    UnitFeed,
    Alignment,
    RawPush,
}

/// One printer instruction.
///
/// Parsing picks a typed variant by discriminator key only when that variant
/// writes the record back exactly. Anything else, including records with
/// extra keys or implied defaults, stays [`Instruction::Raw`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Instruction {
    SetEncoding(SetEncoding),
    CutPaper(CutPaper),
    OpenDrawer(OpenDrawer),
    BitmapFromPath(BitmapPath),
    BitmapFromBytes(BitmapBytes),
    BitmapFromText(BitmapText),
    Text(AppendText),
    LineFeed(LineFeed),
    UnitFeed(UnitFeed),
    Alignment(SetAlignment),
    /// A caller-supplied record passed through unchanged.
    Raw(Map<String, Value>),
}

impl Instruction {
    /// A raw record, for commands this crate does not model.
    pub fn raw(record: Map<String, Value>) -> Self {
        Self::Raw(record)
    }

    /// Classify a record.
    pub fn from_record(record: Map<String, Value>) -> Self {
        let has = |key: &str| record.contains_key(key);
        let typed = if has("appendEncoding") {
            exact(&record).map(Self::SetEncoding)
        } else if has("appendCutPaper") {
            exact(&record).map(Self::CutPaper)
        } else if has("openCashDrawer") {
            exact(&record).map(Self::OpenDrawer)
        } else if has("appendBitmap") {
            exact(&record).map(Self::BitmapFromPath)
        } else if has("appendBitmapByte") {
            exact(&record).map(Self::BitmapFromBytes)
        } else if has("appendBitmapText") {
            exact(&record).map(Self::BitmapFromText)
        } else if has("append") {
            exact(&record).map(Self::Text)
        } else if has("appendLineFeed") {
            exact(&record).map(Self::LineFeed)
        } else if has("appendUnitFeed") {
            exact(&record).map(Self::UnitFeed)
        } else if has("appendAlignment") {
            exact(&record).map(Self::Alignment)
        } else {
            None
        };
        typed.unwrap_or(Self::Raw(record))
    }

    pub fn kind(&self) -> InstructionKind {
        match self {
            Self::SetEncoding(_) => InstructionKind::SetEncoding,
            Self::CutPaper(_) => InstructionKind::CutPaper,
            Self::OpenDrawer(_) => InstructionKind::OpenDrawer,
            Self::BitmapFromPath(_) => InstructionKind::BitmapFromPath,
            Self::BitmapFromBytes(_) => InstructionKind::BitmapFromBytes,
            Self::BitmapFromText(_) => InstructionKind::BitmapFromText,
            Self::Text(_) => InstructionKind::Text,
            Self::LineFeed(_) => InstructionKind::LineFeed,
            Self::UnitFeed(_) => InstructionKind::UnitFeed,
            Self::Alignment(_) => InstructionKind::Alignment,
            Self::Raw(_) => InstructionKind::RawPush,
        }
    }

    /// Serialize to the SDK's key-value record.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl<'de> Deserialize<'de> for Instruction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_record)
    }
}

/// Parse `record` as `T` if `T` serializes back to the same record.
fn exact<T: Serialize + DeserializeOwned>(record: &Map<String, Value>) -> Option<T> {
    let value = Value::Object(record.clone());
    let typed: T = serde_json::from_value(value.clone()).ok()?;
    (serde_json::to_value(&typed).ok()? == value).then_some(typed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEncoding {
    #[serde(rename = "appendEncoding")]
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutPaper {
    #[serde(rename = "appendCutPaper")]
    pub action: CutPaperAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDrawer {
    #[serde(rename = "openCashDrawer")]
    pub port: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendText {
    #[serde(rename = "append")]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFeed {
    #[serde(rename = "appendLineFeed")]
    pub lines: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFeed {
    #[serde(rename = "appendUnitFeed")]
    pub units: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAlignment {
    #[serde(rename = "appendAlignment")]
    pub alignment: Alignment,
}

/// Where a bitmap lands on the page. Every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Horizontal offset from the left margin, in dots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
}

/// Placement setters shared by every bitmap parameter struct.
macro_rules! placement_setters {
    ($ty:ty) => {
        impl $ty {
            pub fn absolute_position(mut self, dots: i32) -> Self {
                self.placement.absolute_position = Some(dots);
                self
            }

            pub fn alignment(mut self, alignment: Alignment) -> Self {
                self.placement.alignment = Some(alignment);
                self
            }

            pub fn rotation(mut self, rotation: Rotation) -> Self {
                self.placement.rotation = Some(rotation);
                self
            }
        }
    };
}

/// Print an image file the SDK loads from `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapPath {
    #[serde(rename = "appendBitmap")]
    pub path: String,
    #[serde(default = "default_true")]
    pub diffusion: bool,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_true")]
    pub both_scale: bool,
    #[serde(flatten)]
    pub placement: Placement,
}

impl BitmapPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            diffusion: true,
            width: DEFAULT_BITMAP_WIDTH,
            both_scale: true,
            placement: Placement::default(),
        }
    }

    pub fn diffusion(mut self, diffusion: bool) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn both_scale(mut self, both_scale: bool) -> Self {
        self.both_scale = both_scale;
        self
    }
}

placement_setters!(BitmapPath);

/// Print an encoded image carried inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapBytes {
    #[serde(rename = "appendBitmapByte")]
    pub bytes: Vec<u8>,
    #[serde(default = "default_true")]
    pub diffusion: bool,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_true")]
    pub both_scale: bool,
    #[serde(flatten)]
    pub placement: Placement,
}

impl BitmapBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            diffusion: true,
            width: DEFAULT_BITMAP_WIDTH,
            both_scale: true,
            placement: Placement::default(),
        }
    }

    pub fn diffusion(mut self, diffusion: bool) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn both_scale(mut self, both_scale: bool) -> Self {
        self.both_scale = both_scale;
        self
    }
}

placement_setters!(BitmapBytes);

/// Text the SDK renders to a bitmap itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapText {
    #[serde(rename = "appendBitmapText")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default = "default_true")]
    pub diffusion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default = "default_true")]
    pub both_scale: bool,
    #[serde(flatten)]
    pub placement: Placement,
}

impl BitmapText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: None,
            diffusion: true,
            width: None,
            both_scale: true,
            placement: Placement::default(),
        }
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn diffusion(mut self, diffusion: bool) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn both_scale(mut self, both_scale: bool) -> Self {
        self.both_scale = both_scale;
        self
    }
}

placement_setters!(BitmapText);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_bitmap_path_defaults_omit_placement() {
        let value = Instruction::BitmapFromPath(BitmapPath::new("a.png"))
            .to_json()
            .unwrap();
        assert_eq!(
            value,
            json!({"appendBitmap": "a.png", "bothScale": true, "diffusion": true, "width": 576})
        );
    }

    #[test]
    fn test_bitmap_path_with_rotation() {
        let bitmap = BitmapPath::new("a.png").rotation(Rotation::Right90);
        let value = Instruction::BitmapFromPath(bitmap).to_json().unwrap();
        assert_eq!(value["rotation"], json!("Right90"));
        assert!(value.get("alignment").is_none());
        assert!(value.get("absolutePosition").is_none());
    }

    #[test]
    fn test_bitmap_text_optional_width() {
        let value = Instruction::BitmapFromText(BitmapText::new("Hi").font_size(24))
            .to_json()
            .unwrap();
        assert_eq!(
            value,
            json!({"appendBitmapText": "Hi", "fontSize": 24, "diffusion": true, "bothScale": true})
        );
    }

    #[test]
    fn test_parse_by_discriminator() {
        let parsed: Instruction = serde_json::from_value(json!({"openCashDrawer": 3})).unwrap();
        assert_eq!(parsed, Instruction::OpenDrawer(OpenDrawer { port: 3 }));

        let parsed: Instruction = serde_json::from_value(json!({
            "appendBitmapByte": [1, 2, 3],
            "diffusion": true,
            "width": 576,
            "bothScale": true,
            "alignment": "Center"
        }))
        .unwrap();
        assert_eq!(
            parsed,
            Instruction::BitmapFromBytes(
                BitmapBytes::new(vec![1, 2, 3]).alignment(Alignment::Center),
            )
        );
    }

    #[test]
    fn test_extra_keys_stay_raw() {
        let record = json!({"openCashDrawer": 3, "channel": 2});
        let parsed: Instruction = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(parsed.kind(), InstructionKind::RawPush);
        assert_eq!(parsed.to_json().unwrap(), record);
    }

    #[test]
    fn test_implied_defaults_stay_raw() {
        let record = json!({"appendBitmap": "a.png"});
        let parsed: Instruction = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(parsed.kind(), InstructionKind::RawPush);
        assert_eq!(parsed.to_json().unwrap(), record);
    }

    #[test]
    fn test_unknown_record_is_raw() {
        let parsed: Instruction =
            serde_json::from_value(json!({"appendQrCode": "data", "cell": 4})).unwrap();
        assert_eq!(parsed.kind(), InstructionKind::RawPush);
    }
}
