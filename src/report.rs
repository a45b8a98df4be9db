//! Cucumber JSON 리포트 데이터 모델 모듈
//!
//! Cucumber JSON 스키마(Feature/Element/Step 트리)의 serde 정의와
//! Feature 병합/정렬 변환을 담당합니다.

use std::collections::HashMap;

use clap::ValueEnum;
use serde::Deserialize;

/// Feature 정렬 방식
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum SortingMethod {
    /// 파싱/발견 순서 유지
    #[default]
    Natural,
    /// Feature 이름 기준 대소문자 무시 정렬
    Alphabetical,
}

impl std::fmt::Display for SortingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortingMethod::Natural => write!(f, "NATURAL"),
            SortingMethod::Alphabetical => write!(f, "ALPHABETICAL"),
        }
    }
}

/// 스텝 실행 상태
///
/// 알 수 없는 상태는 `Unknown`으로 수집되어 스텝 총계에만 반영됩니다.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
    Pending,
    Undefined,
    #[serde(other)]
    #[default]
    Unknown,
}

/// 스텝 실행 결과 (duration은 나노초 단위)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StepResult {
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// 시나리오 내의 단일 스텝
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub result: StepResult,
}

/// 시나리오 또는 시나리오 아웃라인
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line: u64,
    #[serde(default, rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// 리포트 최상위 Feature (id가 병합 키)
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// 동일한 id를 가진 Feature들을 하나로 병합
///
/// 최초 등장한 Feature의 메타데이터(name, uri, description)를 유지하고
/// 이후 등장분의 시나리오 목록을 등장 순서대로 이어 붙입니다.
/// 삽입 순서를 보존하는 vec + id 인덱스 맵을 사용하므로 결과가 결정적입니다.
///
/// # Examples
/// ```
/// use cukegate::report::{Feature, merge_features_by_id};
///
/// let features: Vec<Feature> = serde_json::from_str(
///     r#"[{"id": "a", "elements": [{"name": "s1"}]},
///         {"id": "a", "elements": [{"name": "s2"}]}]"#,
/// ).unwrap();
/// let merged = merge_features_by_id(features);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].elements.len(), 2);
/// ```
pub fn merge_features_by_id(features: Vec<Feature>) -> Vec<Feature> {
    let mut merged: Vec<Feature> = Vec::with_capacity(features.len());
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for feature in features {
        match index_by_id.get(&feature.id) {
            Some(&idx) => merged[idx].elements.extend(feature.elements),
            None => {
                index_by_id.insert(feature.id.clone(), merged.len());
                merged.push(feature);
            }
        }
    }

    merged
}

/// Feature 이름 기준 대소문자 무시 정렬 (ALPHABETICAL 모드)
pub fn sort_features_alphabetically(features: &mut [Feature]) {
    features.sort_by_key(|f| f.name.to_lowercase());
}
