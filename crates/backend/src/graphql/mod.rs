use std::sync::Arc;

use async_graphql::{Context, Object, SimpleObject};
use atlas_shared::{
    flags,
    models::{EmpireSet, FlagRule, TradingPost},
    timeline, visibility,
};

use crate::assets::Assets;

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlTimeline {
    pub min_year: i32,
    pub max_year: i32,
    pub play_interval_ms: u32,
}

#[derive(SimpleObject, Clone)]
pub struct GqlTradingPost {
    pub name: String,
    pub alt_names: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub empire: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl From<&TradingPost> for GqlTradingPost {
    fn from(p: &TradingPost) -> Self {
        GqlTradingPost {
            name: p.name.clone(),
            alt_names: p.alt_names.clone(),
            lon: p.lon,
            lat: p.lat,
            empire: p.empire.clone(),
            start_year: p.start_year,
            end_year: p.end_year,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlFlagRule {
    pub from: i32,
    pub to: i32,
    pub icon: String,
    pub icon_url: String,
}

impl GqlFlagRule {
    // Not `From`: the derived getter for the `from` field would shadow it.
    fn from_rule(r: &FlagRule) -> Self {
        GqlFlagRule {
            from: r.from,
            to: r.to,
            icon: r.icon.clone(),
            icon_url: flags::icon_url(&r.icon),
        }
    }
}

/// A visible post with the flag its empire flies that year.
#[derive(SimpleObject)]
pub struct GqlMarker {
    pub post: GqlTradingPost,
    pub icon: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(SimpleObject)]
pub struct GqlWorld {
    pub width: f64,
    pub height: f64,
    pub land_paths: Vec<String>,
    pub graticule_path: String,
}

pub struct GqlEmpire {
    name: String,
    post_count: usize,
}

#[Object]
impl GqlEmpire {
    async fn name(&self) -> &str {
        &self.name
    }

    async fn post_count(&self) -> u32 {
        self.post_count as u32
    }

    async fn rules(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlFlagRule>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .atlas
            .flags()
            .rules(&self.name)
            .iter()
            .map(GqlFlagRule::from_rule)
            .collect())
    }

    /// Icon shown next to the empire in the filter panel for `year`.
    async fn preview_icon(
        &self,
        ctx: &Context<'_>,
        year: i32,
    ) -> async_graphql::Result<Option<String>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.atlas.icon_for(&self.name, year).map(str::to_string))
    }
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn timeline(&self) -> GqlTimeline {
        GqlTimeline {
            min_year: timeline::YEAR_MIN,
            max_year: timeline::YEAR_MAX,
            play_interval_ms: timeline::PLAY_INTERVAL_MS,
        }
    }

    /// Empires in order of first appearance in the post table.
    async fn empires(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlEmpire>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .atlas
            .empires()
            .iter()
            .map(|name| GqlEmpire {
                name: name.clone(),
                post_count: assets
                    .atlas
                    .posts()
                    .iter()
                    .filter(|p| &p.empire == name)
                    .count(),
            })
            .collect())
    }

    async fn posts(
        &self,
        ctx: &Context<'_>,
        empire: Option<String>,
    ) -> async_graphql::Result<Vec<GqlTradingPost>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .atlas
            .posts()
            .iter()
            .filter(|p| match &empire {
                Some(e) => &p.empire == e,
                None => true,
            })
            .map(GqlTradingPost::from)
            .collect())
    }

    /// Posts active in `year` for the given empires (all when omitted).
    async fn visible_posts(
        &self,
        ctx: &Context<'_>,
        year: i32,
        empires: Option<Vec<String>>,
    ) -> async_graphql::Result<Vec<GqlMarker>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let active: EmpireSet = match empires {
            Some(list) => list.into_iter().collect(),
            None => assets.atlas.empires().iter().cloned().collect(),
        };
        Ok(
            visibility::visible_posts(assets.atlas.posts(), year, &active)
                .into_iter()
                .map(|post| {
                    let icon = assets.atlas.icon_for(&post.empire, year);
                    GqlMarker {
                        post: GqlTradingPost::from(post),
                        icon: icon.map(str::to_string),
                        icon_url: icon.map(flags::icon_url),
                    }
                })
                .collect(),
        )
    }

    /// Strict resolution: `null` when no rule covers `year`.
    async fn flag(
        &self,
        ctx: &Context<'_>,
        empire: String,
        year: i32,
    ) -> async_graphql::Result<Option<String>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .atlas
            .flags()
            .resolve(&empire, year)
            .map(str::to_string))
    }

    async fn flag_rules(
        &self,
        ctx: &Context<'_>,
        empire: String,
    ) -> async_graphql::Result<Vec<GqlFlagRule>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .atlas
            .flags()
            .rules(&empire)
            .iter()
            .map(GqlFlagRule::from_rule)
            .collect())
    }

    async fn world(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlWorld> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let world = &assets.world;
        Ok(GqlWorld {
            width: world.width,
            height: world.height,
            land_paths: world.land_paths.clone(),
            graticule_path: world.graticule_path.clone(),
        })
    }
}

pub type Schema = async_graphql::Schema<
    QueryRoot,
    async_graphql::EmptyMutation,
    async_graphql::EmptySubscription,
>;

pub fn build_schema(assets: Arc<Assets>) -> Schema {
    async_graphql::Schema::build(
        QueryRoot,
        async_graphql::EmptyMutation,
        async_graphql::EmptySubscription,
    )
    .data(assets)
    .finish()
}
