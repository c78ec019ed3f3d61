use color_eyre::eyre::Result;

/// Status as reported by `GET /api/json`.
///
/// `status` is kept as the backend's string so unrecognized values can be
/// shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerStatus {
    pub name: Option<String>,
    pub status: String,
}

#[derive(serde::Deserialize)]
struct ContainerResponse {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "State")]
    state: StateResponse,
}

#[derive(serde::Deserialize)]
struct StateResponse {
    #[serde(rename = "Status")]
    status: String,
}

pub fn parse_status(json: &str) -> Result<ContainerStatus> {
    let resp: ContainerResponse = serde_json::from_str(json)?;
    let name = resp
        .name
        .map(|n| n.trim_start_matches('/').to_string())
        .filter(|n| !n.is_empty());
    Ok(ContainerStatus {
        name,
        status: resp.state.status,
    })
}
