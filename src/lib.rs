#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
use pyo3::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod ast;
mod builder;
mod compiler;
mod complete;
mod error;
mod parser;
mod printer;
mod types;

pub use ast::{Arity, Content, Operator, Topic};
pub use builder::ContentBuilder;
pub use compiler::{compile, compile_with, contents_of, CompileOptions};
pub use error::ContentError;
pub use printer::{OVER, SKIP};
pub use types::{
    Agent, ContentView, Judge, JudgeRecord, Role, Species, Status, UtteranceKind, UtteranceRecord,
    UtteranceRef, Vote, VoteRecord,
};

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
fn compile_text(text: String) -> String {
    compile(&text).text().to_string()
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
fn compile_json(text: String) -> PyResult<String> {
    let content = compile(&text);
    serde_json::to_string_pretty(&ContentView::from(&content))
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
fn agent_token(index: i64) -> PyResult<String> {
    Agent::new(index)
        .map(|agent| agent.to_string())
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn compile_text_wasm(text: &str) -> String {
    compile(text).text().to_string()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn compile_json_wasm(text: &str) -> Result<String, JsValue> {
    let content = compile(text);
    serde_json::to_string_pretty(&ContentView::from(&content))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pymodule]
fn aiwolf_content(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compile_text, m)?)?;
    m.add_function(wrap_pyfunction!(compile_json, m)?)?;
    m.add_function(wrap_pyfunction!(agent_token, m)?)?;
    Ok(())
}
