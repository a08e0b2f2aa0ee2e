//! Parsing of `family:kind,key=value,...` operation specs.
//!
//! Examples: `blur:gaussian,sigma=2.0`, `transform:rotate180`,
//! `morphology:erode,kernel_size=5x5,iterations=2`.

use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;

use retouch_core::{
    BeautifyKind, BlurKind, BrightnessKind, EdgeKind, HistogramKind, MorphologyKind, NullDetector,
    OpConfig, Operation, SharpenKind, TransformKind,
};

/// Parse one operation spec into an operation and its configuration.
pub fn parse_op(spec: &str) -> anyhow::Result<(Operation, OpConfig)> {
    let (family, rest) = spec
        .split_once(':')
        .with_context(|| format!("operation spec '{spec}' is missing ':<kind>'"))?;
    let mut parts = rest.split(',');
    let kind = parts
        .next()
        .filter(|k| !k.is_empty())
        .with_context(|| format!("operation spec '{spec}' is missing a kind"))?;

    let operation = build_operation(family.trim(), kind.trim())?;

    let mut config = OpConfig::new();
    for part in parts {
        let (key, raw) = part
            .split_once('=')
            .with_context(|| format!("option '{part}' is not of the form key=value"))?;
        config = config.with(key.trim(), parse_value(raw.trim()));
    }
    Ok((operation, config))
}

fn build_operation(family: &str, kind: &str) -> anyhow::Result<Operation> {
    let parse_err = |e: String| anyhow::anyhow!(e);
    let op = match family {
        "blur" => Operation::Blur(kind.parse::<BlurKind>().map_err(parse_err)?),
        "brightness" => Operation::Brightness(kind.parse::<BrightnessKind>().map_err(parse_err)?),
        "sharpen" => Operation::Sharpen(kind.parse::<SharpenKind>().map_err(parse_err)?),
        "edges" => Operation::EdgeDetection(kind.parse::<EdgeKind>().map_err(parse_err)?),
        "histogram" => Operation::Histogram(kind.parse::<HistogramKind>().map_err(parse_err)?),
        "morphology" => Operation::Morphology(kind.parse::<MorphologyKind>().map_err(parse_err)?),
        "transform" => Operation::Transform(kind.parse::<TransformKind>().map_err(parse_err)?),
        "beautify" => {
            let kind = kind.parse::<BeautifyKind>().map_err(parse_err)?;
            if kind != BeautifyKind::SoftFilter {
                // No face detector is wired into the CLI; region-based
                // strategies will report "no change"
                tracing::warn!(
                    "beautify.{} needs a face detector; without one it is a no-op",
                    kind.as_str()
                );
            }
            Operation::face_beautify(kind, Arc::new(NullDetector))
        }
        other => bail!(
            "unknown operation family '{other}' \
             (expected blur, brightness, sharpen, edges, histogram, morphology, transform, beautify)"
        ),
    };
    Ok(op)
}

/// Interpret an option value: integer, float, bool, `WxH` pair, or string.
fn parse_value(raw: &str) -> Value {
    if let Ok(v) = raw.parse::<i64>() {
        return Value::from(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return Value::from(v);
    }
    if let Ok(v) = raw.parse::<bool>() {
        return Value::from(v);
    }
    if let Some((w, h)) = raw.split_once('x') {
        if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
            return Value::Array(vec![Value::from(w), Value::from(h)]);
        }
    }
    Value::from(raw)
}
