use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn flatten(json_str: &str, base_name: &str) -> Result<String, String> {
    let document: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| format!("JSON parse error: {}", e))?;

    jsonql_core::flatten(&document, base_name).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn keys_for_value(json_str: &str, target: &str) -> Result<String, String> {
    let document: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| format!("JSON parse error: {}", e))?;

    let keys = jsonql_core::keys_for_value(&document, target).map_err(|e| e.to_string())?;

    serde_json::to_string(&keys).map_err(|e| format!("Serialization error: {}", e))
}

#[wasm_bindgen]
pub fn keys_for_value_exact(json_str: &str, target: &str) -> Result<String, String> {
    let document: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| format!("JSON parse error: {}", e))?;

    let keys = jsonql_core::keys_for_value_exact(&document, target);

    serde_json::to_string(&keys).map_err(|e| format!("Serialization error: {}", e))
}
