use serde::{Deserialize, Serialize};

use netpainter_core::{Point, Rgb, Size};

use crate::surface::{DrawingSurface, StrokeStyle, TextStyle};

/// A single primitive call, as received by a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRectangle {
        top_left: Point,
        size: Size,
        color: Rgb,
    },
    FillPolygon {
        vertices: Vec<Point>,
        color: Rgb,
    },
    StrokePolyline {
        vertices: Vec<Point>,
        stroke: StrokeStyle,
    },
    PlaceText {
        origin: Point,
        text: String,
        style: TextStyle,
    },
}

/// A surface that records every primitive instead of rasterizing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every `PlaceText` command, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::PlaceText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl DrawingSurface for RecordingSurface {
    fn fill_rectangle(&mut self, top_left: Point, size: Size, color: Rgb) {
        self.commands.push(DrawCommand::FillRectangle {
            top_left,
            size,
            color,
        });
    }

    fn fill_polygon(&mut self, vertices: &[Point], color: Rgb) {
        self.commands.push(DrawCommand::FillPolygon {
            vertices: vertices.to_vec(),
            color,
        });
    }

    fn stroke_polyline(&mut self, vertices: &[Point], stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePolyline {
            vertices: vertices.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn place_text(&mut self, origin: Point, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::PlaceText {
            origin,
            text: text.to_string(),
            style: style.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_json() {
        let mut surface = RecordingSurface::new();
        surface.fill_polygon(
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            Rgb::new(0.5, 0.5, 0.5),
        );
        surface.place_text(Point::new(3.0, 4.0), "3*3*1", &TextStyle::new("arial", 25.0));
        assert_eq!(surface.len(), 2);
        assert_eq!(surface.texts(), vec!["3*3*1"]);

        let json = surface.to_json().unwrap();
        assert!(json.contains("\"op\": \"fill_polygon\""));
        let back: RecordingSurface = serde_json::from_str(&json).unwrap();
        assert_eq!(back.commands, surface.commands);
    }
}
