// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use aws_sdk_s3::types::{Tag, Tagging};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::config::settings::AwsSettings;
use crate::domain::repositories::object_store::{ObjectStore, ObjectStoreError};

/// 解析后的 S3 对象地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    /// 解析 `s3://bucket/key` 形式的地址
    pub fn parse(raw: &str) -> Result<Self, ObjectStoreError> {
        let url = Url::parse(raw).map_err(|_| ObjectStoreError::InvalidUrl(raw.to_string()))?;
        if url.scheme() != "s3" {
            return Err(ObjectStoreError::UnsupportedScheme(url.scheme().to_string()));
        }
        let bucket = url
            .host_str()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ObjectStoreError::InvalidUrl(raw.to_string()))?
            .to_string();
        let key = url.path().trim_start_matches('/').to_string();
        if key.is_empty() {
            return Err(ObjectStoreError::InvalidUrl(raw.to_string()));
        }
        Ok(Self { bucket, key })
    }

    /// 对象键的最后一段，作为本地文件名
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// S3 对象存储实现
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(settings: &AwsSettings) -> Self {
        let mut config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(settings.region.clone()));

        if let (Some(access_key), Some(secret_key)) =
            (&settings.access_key_id, &settings.secret_access_key)
        {
            let credentials = aws_sdk_s3::config::Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                settings.session_token.clone(),
                None,
                "cdms-settings",
            );
            config_builder = config_builder.credentials_provider(credentials);
        }

        if let Some(ep) = &settings.endpoint {
            config_builder = config_builder.endpoint_url(ep).force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(config_builder.build());
        Self { client }
    }

    /// 使用默认凭证链（环境变量、实例角色等）构建客户端
    pub async fn from_env(settings: &AwsSettings) -> Self {
        if settings.access_key_id.is_some() {
            return Self::new(settings);
        }
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()))
            .load()
            .await;
        let mut config_builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(ep) = &settings.endpoint {
            config_builder = config_builder.endpoint_url(ep).force_path_style(true);
        }
        Self {
            client: aws_sdk_s3::Client::from_conf(config_builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, ObjectStoreError> {
        let location = S3Location::parse(url)?;
        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    ObjectStoreError::NotFound(url.to_string())
                } else {
                    ObjectStoreError::Other(service_error.to_string())
                }
            })?;

        fs::create_dir_all(dir).await?;
        let target = dir.join(location.file_name());
        let mut file = fs::File::create(&target).await?;
        let mut body = output.body;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| ObjectStoreError::Other(e.to_string()))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!("downloaded {} to {}", url, target.display());
        Ok(target)
    }

    async fn add_tags(
        &self,
        url: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ObjectStoreError> {
        let location = S3Location::parse(url)?;
        let tag_set = tags
            .iter()
            .map(|(k, v)| {
                Tag::builder()
                    .key(k)
                    .value(v)
                    .build()
                    .map_err(|e| ObjectStoreError::Other(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| ObjectStoreError::Other(e.to_string()))?;

        self.client
            .put_object_tagging()
            .bucket(&location.bucket)
            .key(&location.key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Other(e.into_service_error().to_string()))?;
        Ok(())
    }
}

/// 本地文件系统对象存储实现
///
/// 处理 `file://` 地址与普通路径；标签写入同目录的 `<name>.tags.json`。
#[derive(Debug, Default, Clone)]
pub struct LocalObjectStore;

impl LocalObjectStore {
    pub fn new() -> Self {
        Self
    }

    fn resolve(url: &str) -> Result<PathBuf, ObjectStoreError> {
        if url.starts_with("file://") {
            let parsed =
                Url::parse(url).map_err(|_| ObjectStoreError::InvalidUrl(url.to_string()))?;
            return parsed
                .to_file_path()
                .map_err(|_| ObjectStoreError::InvalidUrl(url.to_string()));
        }
        Ok(PathBuf::from(url))
    }

    fn tags_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tags.json");
        path.with_file_name(name)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, ObjectStoreError> {
        let source = Self::resolve(url)?;
        let file_name = source
            .file_name()
            .ok_or_else(|| ObjectStoreError::InvalidUrl(url.to_string()))?;

        fs::create_dir_all(dir).await?;
        let target = dir.join(file_name);
        match fs::copy(&source, &target).await {
            Ok(_) => Ok(target),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectStoreError::NotFound(url.to_string()))
            }
            Err(e) => Err(ObjectStoreError::Io(e)),
        }
    }

    async fn add_tags(
        &self,
        url: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ObjectStoreError> {
        let source = Self::resolve(url)?;
        if !fs::try_exists(&source).await? {
            return Err(ObjectStoreError::NotFound(url.to_string()));
        }
        let body = serde_json::to_vec_pretty(tags)
            .map_err(|e| ObjectStoreError::Other(e.to_string()))?;
        fs::write(Self::tags_path(&source), body).await?;
        Ok(())
    }
}

/// 按地址协议分发的对象存储
///
/// 未配置的后端对应的地址一律以 `UnsupportedScheme` 拒绝。
pub struct RoutingObjectStore {
    s3: Option<Arc<dyn ObjectStore>>,
    local: Option<Arc<dyn ObjectStore>>,
}

impl RoutingObjectStore {
    pub fn new(s3: Option<Arc<dyn ObjectStore>>, local: Option<Arc<dyn ObjectStore>>) -> Self {
        Self { s3, local }
    }

    fn route(&self, url: &str) -> Result<&Arc<dyn ObjectStore>, ObjectStoreError> {
        match url.split_once("://").map(|(scheme, _)| scheme) {
            Some("s3") => self
                .s3
                .as_ref()
                .ok_or_else(|| ObjectStoreError::UnsupportedScheme("s3".to_string())),
            Some("file") | None => self
                .local
                .as_ref()
                .ok_or_else(|| ObjectStoreError::UnsupportedScheme("file".to_string())),
            Some(other) => Err(ObjectStoreError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[async_trait]
impl ObjectStore for RoutingObjectStore {
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, ObjectStoreError> {
        self.route(url)?.download(url, dir).await
    }

    async fn add_tags(
        &self,
        url: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ObjectStoreError> {
        self.route(url)?.add_tags(url, tags).await
    }
}
