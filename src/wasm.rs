//! WASM bindings for Analog Bench.
//!
//! This module provides JavaScript-friendly bindings for an oscilloscope
//! front end running in the browser.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmResonantBench } from 'analog_bench';
//!
//! await init();
//!
//! const bench = new WasmResonantBench();
//! bench.set_resistor(100);    // ohms
//! bench.set_capacitor(100);   // nanofarads
//! bench.set_inductor(10);     // millihenries
//! bench.set_generator("square", 1.0, 5000);
//!
//! const trace = bench.render_output(512); // one period of the resistor voltage
//! ```

use wasm_bindgen::prelude::*;

use crate::error::BenchError;
use crate::graph::{Bench, ModelId, ProviderId, SwitchId};
use crate::signal::{FunctionGenerator, Waveform};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: BenchError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A function generator wired to a resonant circuit board.
#[wasm_bindgen]
pub struct WasmResonantBench {
    bench: Bench,
    generator: ProviderId,
    model: ModelId,
    debug: SwitchId,
}

#[wasm_bindgen]
impl WasmResonantBench {
    /// Create a bench with a 100 Ω, 100 nF, 10 mH circuit and a 1 kHz sine.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmResonantBench, JsValue> {
        Self::build().map_err(js_error)
    }

    fn build() -> crate::Result<WasmResonantBench> {
        let mut bench = Bench::new();
        let generator = bench.add_provider("generator");
        let debug = bench.add_switch("debug", false);
        let model = bench.add_resonant_circuit("rlc", generator)?;
        bench.batch(|b| {
            b.set_resistor(model, 100.0)?;
            b.set_capacitor(model, 100.0)?;
            b.set_inductor(model, 10.0)?;
            b.set_debug_switch(model, debug)
        })?;
        bench.set_signal(generator, FunctionGenerator::new().signal()?)?;

        Ok(WasmResonantBench {
            bench,
            generator,
            model,
            debug,
        })
    }

    /// Set the resistor in ohms.
    #[wasm_bindgen]
    pub fn set_resistor(&mut self, ohms: f64) -> Result<(), JsValue> {
        self.bench.set_resistor(self.model, ohms).map_err(js_error)
    }

    /// Set the capacitor in nanofarads.
    #[wasm_bindgen]
    pub fn set_capacitor(&mut self, nanofarads: f64) -> Result<(), JsValue> {
        self.bench.set_capacitor(self.model, nanofarads).map_err(js_error)
    }

    /// Set the inductor in millihenries.
    #[wasm_bindgen]
    pub fn set_inductor(&mut self, millihenries: f64) -> Result<(), JsValue> {
        self.bench.set_inductor(self.model, millihenries).map_err(js_error)
    }

    /// Force the numeric solver (the board's debug switch).
    #[wasm_bindgen]
    pub fn set_numeric(&mut self, on: bool) -> Result<(), JsValue> {
        self.bench.set_switch(self.debug, on).map_err(js_error)
    }

    /// Reprogram the function generator.
    ///
    /// # Arguments
    /// * `waveform` - `sine`, `square`, `triangle` or `sawtooth`
    /// * `amplitude` - Peak amplitude in volts
    /// * `frequency` - Frequency in Hz
    #[wasm_bindgen]
    pub fn set_generator(&mut self, waveform: &str, amplitude: f64, frequency: f64) -> Result<(), JsValue> {
        let waveform = Waveform::from_str(waveform)
            .ok_or_else(|| js_error(BenchError::invalid_signal(format!("unknown waveform '{waveform}'"))))?;
        let signal = FunctionGenerator::new()
            .with_waveform(waveform)
            .with_amplitude(amplitude)
            .with_frequency(frequency)
            .signal()
            .map_err(js_error)?;
        self.bench.set_signal(self.generator, signal).map_err(js_error)
    }

    /// Natural frequency of the circuit in Hz.
    #[wasm_bindgen(getter)]
    pub fn natural_frequency(&self) -> f64 {
        match self.bench.model(self.model) {
            Ok(crate::models::Model::Resonant(m)) => m.params().natural_frequency(),
            _ => f64::NAN,
        }
    }

    /// One period of the resistor voltage at `samples` points.
    ///
    /// Empty if no output has been computed yet.
    #[wasm_bindgen]
    pub fn render_output(&self, samples: usize) -> Vec<f32> {
        let output = match self.bench.model(self.model) {
            Ok(model) => model.resistor_voltage(),
            Err(_) => return Vec::new(),
        };
        match self.bench.signal(output) {
            Ok(Some(signal)) => signal.render(samples, 1.0).into_iter().map(|v| v as f32).collect(),
            _ => Vec::new(),
        }
    }

    /// One period of the generator output at `samples` points.
    #[wasm_bindgen]
    pub fn render_input(&self, samples: usize) -> Vec<f32> {
        match self.bench.signal(self.generator) {
            Ok(Some(signal)) => signal.render(samples, 1.0).into_iter().map(|v| v as f32).collect(),
            _ => Vec::new(),
        }
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
