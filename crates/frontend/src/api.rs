use std::collections::BTreeMap;

use atlas_shared::flags::FlagConfig;
use atlas_shared::models::{FlagRule, TradingPost};
use atlas_shared::state::Atlas;
use atlas_shared::topology::WorldMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// The first reported error wins over any partial data.
    pub fn into_result(self) -> Result<T, String> {
        if let Some(error) = self.errors.and_then(|errors| errors.into_iter().next()) {
            return Err(error.message);
        }
        self.data.ok_or_else(|| "No data returned".to_string())
    }
}

fn api_url() -> Result<String, String> {
    // Same origin as the page
    let origin = web_sys::window()
        .ok_or("no window")?
        .location()
        .origin()
        .map_err(|_| "page origin unavailable".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;
    gql_resp.into_result()
}

// Types mirroring the GraphQL schema

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmpireData {
    pub name: String,
    pub rules: Vec<FlagRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AtlasResponse {
    pub posts: Vec<TradingPost>,
    pub empires: Vec<EmpireData>,
}

impl AtlasResponse {
    pub fn into_atlas(self) -> Atlas {
        let rules: BTreeMap<String, Vec<FlagRule>> = self
            .empires
            .into_iter()
            .filter(|e| !e.rules.is_empty())
            .map(|e| (e.name, e.rules))
            .collect();
        Atlas::new(self.posts, FlagConfig::new(rules))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldResponse {
    pub world: WorldMap,
}

pub const ATLAS_QUERY: &str = r#"query {
    posts { name altNames lon lat empire startYear endYear }
    empires { name rules { from to icon } }
}"#;

pub const WORLD_QUERY: &str = r#"query { world { width height landPaths graticulePath } }"#;

/// Trading posts and flag rules, ready for local filtering.
pub async fn fetch_atlas() -> Result<Atlas, String> {
    let resp: AtlasResponse = query(ATLAS_QUERY, None).await?;
    Ok(resp.into_atlas())
}

pub async fn fetch_world() -> Result<WorldMap, String> {
    let resp: WorldResponse = query(WORLD_QUERY, None).await?;
    Ok(resp.world)
}
