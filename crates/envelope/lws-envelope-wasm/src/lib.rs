use js_sys::{Reflect, JSON};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use lws_envelope_core::{
    bake_envelope, bake_envelope_with_derivatives, bake_motion, export_envelope_json,
    export_motion_json, parse_envelope_json, parse_motion_json,
    sampling::{slope_at_with, DEFAULT_DERIVATIVE_EPSILON},
    BakedEnvelope, BakingConfig, CachedEnvelope, EvalConfig, Motion,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Accept either a JSON string or a plain JS object and return JSON text for the core parsers.
fn json_text(value: &JsValue, what: &str) -> Result<String, JsError> {
    if jsvalue_is_undefined_or_null(value) {
        return Err(JsError::new(&format!("{what}: data is null/undefined")));
    }
    if let Some(s) = value.as_string() {
        return Ok(s);
    }
    JSON::stringify(value)
        .map_err(|e| JsError::new(&format!("{what} stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

/// Parse an optional BakingConfig. The instance's evaluation settings apply
/// unless the config carries its own `eval` object.
fn baking_config(cfg: JsValue, eval: EvalConfig) -> Result<BakingConfig, JsError> {
    if jsvalue_is_undefined_or_null(&cfg) {
        return Ok(BakingConfig {
            eval,
            ..Default::default()
        });
    }
    let has_eval = Reflect::get(&cfg, &JsValue::from_str("eval"))
        .map(|v| !jsvalue_is_undefined_or_null(&v))
        .unwrap_or(false);
    let mut parsed: BakingConfig =
        swb::from_value(cfg).map_err(|e| JsError::new(&format!("baking config error: {e}")))?;
    if !has_eval {
        parsed.eval = eval;
    }
    Ok(parsed)
}

#[derive(Serialize)]
struct BakedWithDerivatives {
    values: BakedEnvelope,
    derivatives: BakedEnvelope,
}

/// A single scalar envelope, evaluated with one-entry memoization.
#[wasm_bindgen]
pub struct WasmEnvelope {
    core: CachedEnvelope,
}

#[wasm_bindgen]
impl WasmEnvelope {
    /// Build an envelope from envelope JSON (string or object).
    /// `config` is optional JSON matching EvalConfig.
    /// Example:
    ///   new WasmEnvelope({ pre: "constant", post: "repeat", keys: [...] })
    #[wasm_bindgen(constructor)]
    pub fn new(data: JsValue, config: JsValue) -> Result<WasmEnvelope, JsError> {
        console_error_panic_hook::set_once();

        let cfg: EvalConfig = if jsvalue_is_undefined_or_null(&config) {
            EvalConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let text = json_text(&data, "WasmEnvelope")?;
        let envelope = parse_envelope_json(&text)
            .map_err(|e| JsError::new(&format!("envelope parse error: {e}")))?;

        Ok(WasmEnvelope {
            core: CachedEnvelope::with_config(envelope, cfg),
        })
    }

    /// Envelope value at `time` (seconds).
    #[wasm_bindgen]
    pub fn eval(&mut self, time: f32) -> f32 {
        self.core.eval(time)
    }

    /// Evaluate a batch of times. Returns a Float32Array.
    #[wasm_bindgen(js_name = eval_many)]
    pub fn eval_many(&mut self, times: &[f32]) -> Vec<f32> {
        times.iter().map(|&t| self.core.eval(t)).collect()
    }

    /// Central-difference slope at `time`; `eps` defaults to 1e-3.
    #[wasm_bindgen]
    pub fn slope(&self, time: f32, eps: Option<f32>) -> f32 {
        slope_at_with(
            self.core.envelope(),
            time,
            eps.unwrap_or(DEFAULT_DERIVATIVE_EPSILON),
            self.core.config(),
        )
    }

    #[wasm_bindgen(js_name = key_count)]
    pub fn key_count(&self) -> usize {
        self.core.envelope().len()
    }

    /// `[first, last]` key times, or undefined for an empty envelope.
    #[wasm_bindgen(js_name = time_range)]
    pub fn time_range(&self) -> Option<Vec<f32>> {
        self.core.envelope().time_range().map(|(a, b)| vec![a, b])
    }

    /// Bake at a fixed frame rate. `cfg` is optional JSON matching BakingConfig.
    #[wasm_bindgen]
    pub fn bake(&self, cfg: JsValue) -> Result<JsValue, JsError> {
        let cfg = baking_config(cfg, *self.core.config())?;
        let baked = bake_envelope(self.core.envelope(), &cfg)
            .map_err(|e| JsError::new(&format!("bake error: {e}")))?;
        swb::to_value(&baked).map_err(|e| JsError::new(&format!("bake output error: {e}")))
    }

    /// Bake values and slopes. Returns `{ values, derivatives }`.
    #[wasm_bindgen(js_name = bake_with_derivatives)]
    pub fn bake_with_derivatives(&self, cfg: JsValue) -> Result<JsValue, JsError> {
        let cfg = baking_config(cfg, *self.core.config())?;
        let (values, derivatives) = bake_envelope_with_derivatives(self.core.envelope(), &cfg)
            .map_err(|e| JsError::new(&format!("bake error: {e}")))?;
        swb::to_value(&BakedWithDerivatives {
            values,
            derivatives,
        })
        .map_err(|e| JsError::new(&format!("bake output error: {e}")))
    }

    /// Envelope JSON in the same schema the constructor accepts.
    #[wasm_bindgen(js_name = to_json)]
    pub fn to_json(&self) -> String {
        export_envelope_json(self.core.envelope()).to_string()
    }
}

/// Nine-channel item motion.
#[wasm_bindgen]
pub struct WasmMotion {
    core: Motion,
    config: EvalConfig,
}

#[wasm_bindgen]
impl WasmMotion {
    #[wasm_bindgen(constructor)]
    pub fn new(data: JsValue, config: JsValue) -> Result<WasmMotion, JsError> {
        console_error_panic_hook::set_once();

        let config: EvalConfig = if jsvalue_is_undefined_or_null(&config) {
            EvalConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let text = json_text(&data, "WasmMotion")?;
        let core = parse_motion_json(&text)
            .map_err(|e| JsError::new(&format!("motion parse error: {e}")))?;
        Ok(WasmMotion { core, config })
    }

    /// Returns `{ position, rotation, scale }` at `time`.
    #[wasm_bindgen]
    pub fn eval(&self, time: f32) -> Result<JsValue, JsError> {
        let sample = self.core.eval_with(time, &self.config);
        swb::to_value(&sample).map_err(|e| JsError::new(&format!("motion output error: {e}")))
    }

    #[wasm_bindgen]
    pub fn bake(&self, cfg: JsValue) -> Result<JsValue, JsError> {
        let cfg = baking_config(cfg, self.config)?;
        let baked =
            bake_motion(&self.core, &cfg).map_err(|e| JsError::new(&format!("bake error: {e}")))?;
        swb::to_value(&baked).map_err(|e| JsError::new(&format!("bake output error: {e}")))
    }

    #[wasm_bindgen(js_name = to_json)]
    pub fn to_json(&self) -> String {
        export_motion_json(&self.core).to_string()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
