//! Emitter Config - 이미터 동작 설정
//!
//! TOML / JSON 파일 또는 문자열에서 로드할 수 있습니다.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 기본 설정 파일명
pub const EMITTER_CONFIG_FILE: &str = "emitter.toml";

/// 이벤트 이름당 리스너 경고 임계값 기본값
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// 이미터 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitterConfig {
    /// 이벤트 이름당 리스너 수가 이 값을 넘으면 경고 로그 (0 = 무제한)
    pub max_listeners: usize,

    /// 디버그 모드 (모든 디스패치를 trace 로깅)
    pub debug_mode: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
            debug_mode: false,
        }
    }
}

impl EmitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 경고 임계값 없이 (무제한)
    pub fn unlimited() -> Self {
        Self {
            max_listeners: 0,
            ..Self::default()
        }
    }

    pub fn with_max_listeners(mut self, max: usize) -> Self {
        self.max_listeners = max;
        self
    }

    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// 리스너 수가 임계값을 넘었는지 확인
    pub fn exceeds_max_listeners(&self, count: usize) -> bool {
        self.max_listeners > 0 && count > self.max_listeners
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// TOML 문자열에서 로드
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// JSON 문자열에서 로드
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 파일에서 로드 (확장자로 형식 판단, `.json` 외에는 TOML)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// 파일이 있으면 로드, 없으면 기본값
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
