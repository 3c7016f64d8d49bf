use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use nalgebra::Point3;

use crate::scene::{BodyInfo, BodyKind, SceneRegistry};

/// Reads a scene description. The first line is a header and is skipped; `#`
/// lines and blank lines are ignored. Every other line is one body:
///
/// ```text
/// name label x y z label_offset radius color texture
/// ```
///
/// `color` is `RRGGBB`, `texture` is a path or `-`. A body named `Sun` is
/// drawn as a star.
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<SceneRegistry> {
    let filename = filename.as_ref();
    let contents = fs::read_to_string(filename)
        .with_context(|| format!("Failed to read scene file {}", filename.display()))?;
    parse_scene(&contents).with_context(|| format!("Invalid scene file {}", filename.display()))
}

pub fn parse_scene(contents: &str) -> Result<SceneRegistry> {
    let mut registry = SceneRegistry::new();

    // Skip the header
    for (line_no, line) in contents.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let info = parse_body(line).with_context(|| format!("line {}", line_no + 1))?;
        if registry.find_by_name(&info.name).is_some() {
            bail!("line {}: duplicate body {}", line_no + 1, info.name);
        }
        registry.add_body(info);
    }

    if registry.is_empty() {
        bail!("no bodies defined");
    }
    Ok(registry)
}

fn parse_body(line: &str) -> Result<BodyInfo> {
    let mut fields = line.split_ascii_whitespace();
    let mut next_field = |what: &str| {
        fields
            .next()
            .ok_or_else(|| anyhow!("missing field `{}`", what))
    };

    macro_rules! next_f32 {
        ($what:expr) => {{
            let field = next_field($what)?;
            field
                .parse::<f32>()
                .with_context(|| format!("field `{}` is not a number: {:?}", $what, field))?
        }};
    }

    let name = next_field("name")?.to_owned();
    let label = next_field("label")?.replace('_', " ");
    let position = Point3::new(next_f32!("x"), next_f32!("y"), next_f32!("z"));
    let label_offset = next_f32!("label_offset");
    let radius = next_f32!("radius");
    if radius <= 0.0 {
        bail!("radius must be positive, got {}", radius);
    }
    let color = parse_color(next_field("color")?)?;
    let texture = match next_field("texture")? {
        "-" => None,
        path => Some(PathBuf::from(path)),
    };
    let kind = if name.eq_ignore_ascii_case("sun") {
        BodyKind::Star
    } else {
        BodyKind::Planet
    };

    if let Some(extra) = fields.next() {
        bail!("unexpected trailing field {:?}", extra);
    }

    Ok(BodyInfo {
        name,
        label,
        position,
        label_offset,
        radius,
        color,
        texture,
        kind,
    })
}

fn parse_color(s: &str) -> Result<Point3<f32>> {
    if s.len() != 6 || !s.is_ascii() {
        bail!("color must be six hex digits, got {:?}", s);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).with_context(|| format!("bad color {:?}", s))
    };
    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;

    Ok(Point3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}
