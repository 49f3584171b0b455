//! N-API surface for the desktop host.
//!
//! `compile` runs on the libuv worker pool so the calling JavaScript thread
//! only awaits a promise.

use napi::bindgen_prelude::AsyncTask;
use napi::{Env, Task};
use napi_derive::napi;

use crate::code_lens::{scan_labels, LabelLens};
use crate::compiler::compile;
use crate::editor;

pub struct CompileTask {
    source: String,
}

impl Task for CompileTask {
    type Output = String;
    type JsValue = String;

    fn compute(&mut self) -> napi::Result<Self::Output> {
        compile(&self.source)
            .map(|artifact| artifact.code)
            .map_err(|e| napi::Error::from_reason(e.to_string()))
    }

    fn resolve(&mut self, _env: Env, output: Self::Output) -> napi::Result<Self::JsValue> {
        Ok(output)
    }
}

#[napi(js_name = "compile")]
pub fn compile_native(source: String) -> AsyncTask<CompileTask> {
    AsyncTask::new(CompileTask { source })
}

#[napi(js_name = "scanLabels")]
pub fn scan_labels_native(text: String) -> napi::Result<serde_json::Value> {
    let lenses: Vec<LabelLens> = scan_labels(&text);
    serde_json::to_value(lenses).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[napi(js_name = "editorCode")]
pub fn editor_code_native(user_code: String, environment_code: String) -> String {
    editor::editor_code(&user_code, &environment_code)
}

#[napi(js_name = "extractUserCode")]
pub fn extract_user_code_native(code: String) -> String {
    editor::extract_user_code(&code).to_string()
}

#[napi(js_name = "replaceEnvironmentCode")]
pub fn replace_environment_code_native(code: String, environment_code: String) -> String {
    editor::replace_environment_code(&code, &environment_code)
}

#[napi(js_name = "userCodeStartLine")]
pub fn user_code_start_line_native(code: String) -> u32 {
    editor::user_code_start_line(&code)
}
