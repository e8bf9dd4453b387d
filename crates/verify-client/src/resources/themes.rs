use async_trait::async_trait;
use verify_api_models::{ResourceKind, Theme, ThemeList};

use super::{ResourceClient, created_id, fetch_list, single_match};
use crate::context::ApiContext;
use crate::error::{ApiError, ApiResult};
use crate::http::{CONTENT_TYPE_JSON, HttpRequest, Part};
use crate::params::{ListParams, Locator, Page};

/// Branding themes at `/v1.0/branding/themes`.
///
/// `GET .../{id}` downloads the archive, so single lookups go through the
/// registration list instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Themes;

impl Themes {
    fn upload_parts(theme: &Theme) -> Vec<Part> {
        vec![
            Part {
                name: "files".to_string(),
                file_name: Some(theme.archive_file_name()),
                content_type: "application/octet-stream".to_string(),
                bytes: theme.archive_bytes.clone(),
            },
            Part {
                name: "configuration".to_string(),
                file_name: None,
                content_type: CONTENT_TYPE_JSON.to_string(),
                bytes: theme.configuration().to_string().into_bytes(),
            },
        ]
    }
}

#[async_trait]
impl ResourceClient for Themes {
    type Item = Theme;
    const RESOURCE: ResourceKind = ResourceKind::Theme;
    const PATH: &'static [&'static str] = &["v1.0", "branding", "themes"];

    fn id_of(item: &Theme) -> Option<String> {
        item.id.clone()
    }

    async fn list(&self, ctx: &ApiContext, params: &ListParams) -> ApiResult<Page<Theme>> {
        let list: ThemeList = fetch_list(ctx, Self::PATH, &params.query(), Self::label()).await?;
        let total = list
            .count
            .or_else(|| u64::try_from(list.theme_registrations.len()).ok());
        Ok(Page {
            items: list.theme_registrations,
            total,
        })
    }

    async fn find_by_name(&self, ctx: &ApiContext, name: &str) -> ApiResult<Theme> {
        let page = self.list(ctx, &ListParams::default()).await?;
        single_match(page.items, Self::label(), |theme| theme.name == name)
    }

    async fn get(&self, ctx: &ApiContext, locator: &Locator) -> ApiResult<Theme> {
        match locator {
            Locator::Name(name) => self.find_by_name(ctx, name).await,
            Locator::Id(id) => {
                let page = self.list(ctx, &ListParams::default()).await?;
                single_match(page.items, Self::label(), |theme| {
                    theme.id.as_deref() == Some(id.as_str())
                })
            }
        }
    }

    async fn create(&self, ctx: &ApiContext, item: &Theme) -> ApiResult<String> {
        let request =
            HttpRequest::post(ctx.endpoint(Self::PATH)?).multipart(Self::upload_parts(item));
        let response = ctx.execute(request, Self::label()).await?;
        created_id(&response).ok_or(ApiError::MissingIdentifier {
            resource: Self::label(),
        })
    }

    async fn replace(&self, ctx: &ApiContext, item: &Theme) -> ApiResult<()> {
        let id = self.target_id(ctx, item).await?;
        let request = HttpRequest::put(ctx.item_endpoint(Self::PATH, &id)?)
            .multipart(Self::upload_parts(item));
        ctx.execute(request, Self::label()).await?;
        Ok(())
    }
}
