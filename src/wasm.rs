//! StudyCortex - WASM surface over a single study session
//!
//! Exposed via WASM for TypeScript consumption.
//!
//! # Example (TypeScript)
//! ```typescript
//! const cortex = StudyCortex.withConfig({ max_chunk_words: 300, top_k: 5 });
//! cortex.loadModel(onnxBytes, tokenizerJson);
//! cortex.loadDocuments(["...extracted pdf text...", "...notes..."]);
//! const passages = cortex.ask("What is osmosis?");
//! const context = cortex.formatContext(passages);
//! ```

use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::config::RetrievalConfig;
use crate::embeddings::{EmbedConfig, Embedder, HashEmbedder, OnnxEmbedder, OnnxModel};
use crate::rag::{
    format_context, source_previews, RetrievedPassage, StudySession, DEFAULT_EXCERPT_CHARS,
    DEFAULT_SOURCE_LIMIT,
};

#[wasm_bindgen]
pub struct StudyCortex {
    /// Retrieval knobs applied to every new session
    config: RetrievalConfig,
    /// Model choice for the next `loadModel`
    embed_config: EmbedConfig,
    /// Present once an embedder is loaded
    session: Option<StudySession>,
}

impl Default for StudyCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl StudyCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: RetrievalConfig::default(),
            embed_config: EmbedConfig::default(),
            session: None,
        }
    }

    /// Create with a partial `RetrievalConfig` object
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_js: JsValue) -> Result<StudyCortex, JsValue> {
        let config: RetrievalConfig = serde_wasm_bindgen::from_value(config_js)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Select the ONNX model used by the next `loadModel`
    #[wasm_bindgen(js_name = setModel)]
    pub fn set_model(&mut self, model_id: &str) -> Result<(), JsValue> {
        if self.set_model_internal(model_id) {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!("Unknown model: {}", model_id)))
        }
    }

    /// Load ONNX model bytes and tokenizer JSON. Drops any loaded documents.
    #[wasm_bindgen(js_name = loadModel)]
    pub fn load_model(&mut self, model_bytes: &[u8], tokenizer_json: &str) -> Result<(), JsValue> {
        let embedder = OnnxEmbedder::from_bytes(model_bytes, tokenizer_json, self.embed_config.clone())
            .map_err(|e| JsValue::from_str(&format!("Model load failed: {}", e)))?;

        web_sys::console::log_1(
            &format!(
                "[StudyCortex] Model loaded: {} ({}d)",
                embedder.model_id(),
                embedder.dimensions()
            )
            .into(),
        );

        self.attach(Arc::new(embedder));
        Ok(())
    }

    /// Use the hashing embedder instead of a model
    #[wasm_bindgen(js_name = useHashEmbedder)]
    pub fn use_hash_embedder(&mut self, dimensions: usize) {
        self.attach(Arc::new(HashEmbedder::new(dimensions)));
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    /// Replace the loaded batch with these extracted document strings.
    /// Returns the chunk count.
    #[wasm_bindgen(js_name = loadDocuments)]
    pub fn load_documents(&mut self, documents: JsValue) -> Result<usize, JsValue> {
        let documents: Vec<String> = serde_wasm_bindgen::from_value(documents)
            .map_err(|e| JsValue::from_str(&format!("Invalid documents: {}", e)))?;

        let count = self
            .load_documents_internal(&documents)
            .map_err(|e| JsValue::from_str(&e))?;

        web_sys::console::log_1(
            &format!(
                "[StudyCortex] Indexed {} documents into {} chunks",
                documents.len(),
                count
            )
            .into(),
        );

        Ok(count)
    }

    /// Ranked passages for `query`; `top_k` falls back to the config value
    pub fn ask(&self, query: &str, top_k: Option<usize>) -> Result<JsValue, JsValue> {
        let passages = self.ask_internal(query, top_k).map_err(|e| JsValue::from_str(&e))?;

        serde_wasm_bindgen::to_value(&passages)
            .map_err(|e| JsValue::from_str(&format!("Serialize failed: {}", e)))
    }

    /// Numbered context block for the answer generator
    #[wasm_bindgen(js_name = formatContext)]
    pub fn format_context(&self, passages: JsValue) -> Result<String, JsValue> {
        let passages: Vec<RetrievedPassage> = serde_wasm_bindgen::from_value(passages)
            .map_err(|e| JsValue::from_str(&format!("Invalid passages: {}", e)))?;
        Ok(format_context(&passages))
    }

    /// Source excerpts to show under an answer
    #[wasm_bindgen(js_name = sourcePreviews)]
    pub fn source_previews(&self, passages: JsValue) -> Result<JsValue, JsValue> {
        let passages: Vec<RetrievedPassage> = serde_wasm_bindgen::from_value(passages)
            .map_err(|e| JsValue::from_str(&format!("Invalid passages: {}", e)))?;
        let previews = source_previews(&passages, DEFAULT_SOURCE_LIMIT, DEFAULT_EXCERPT_CHARS);

        serde_wasm_bindgen::to_value(&previews)
            .map_err(|e| JsValue::from_str(&format!("Serialize failed: {}", e)))
    }

    #[wasm_bindgen(js_name = getTopics)]
    pub fn get_topics(&self) -> Vec<String> {
        self.session
            .as_ref()
            .map(|s| s.topics().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> String {
        let stats = self.session.as_ref().and_then(|s| s.stats());
        serde_json::json!({
            "ready": self.is_ready(),
            "model": self.session.as_ref().map(|s| s.embedder().model_id().to_string()),
            "chunks": stats.map_or(0, |s| s.chunk_count),
            "dimensions": stats.map(|s| s.dimensions),
            "buildMs": stats.map(|s| s.elapsed_ms),
            "config": self.config,
        })
        .to_string()
    }

    /// Drop loaded documents, keep the embedder
    pub fn clear(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.clear();
        }
    }
}

// Internal methods (not exposed to WASM)
impl StudyCortex {
    pub fn set_model_internal(&mut self, model_id: &str) -> bool {
        match OnnxModel::from_id(model_id) {
            Some(model) => {
                self.embed_config = EmbedConfig::for_model(model);
                true
            }
            None => false,
        }
    }

    /// Start a fresh session around `embedder`
    pub fn attach(&mut self, embedder: Arc<dyn Embedder>) {
        self.session = Some(StudySession::new(embedder, self.config.clone()));
    }

    pub fn load_documents_internal(&mut self, documents: &[String]) -> Result<usize, String> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| "Model not loaded".to_string())?;

        session
            .load_documents(documents)
            .map(|batch| batch.chunks.len())
            .map_err(|e| format!("Indexing failed: {}", e))
    }

    pub fn ask_internal(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<RetrievedPassage>, String> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| "Model not loaded".to_string())?;

        session
            .ask_with(query, top_k.unwrap_or(self.config.top_k))
            .map_err(|e| format!("Retrieval failed: {}", e))
    }
}
