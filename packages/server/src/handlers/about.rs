use crate::extractors::auth::MaybeUser;
use crate::templates::about::{AuthorPage, TechPage};
use crate::templates::{Format, Page};

pub async fn author(MaybeUser(viewer): MaybeUser, format: Format) -> Page<AuthorPage> {
    Page::new(format, AuthorPage {}).viewer(viewer.as_ref())
}

pub async fn tech(MaybeUser(viewer): MaybeUser, format: Format) -> Page<TechPage> {
    Page::new(format, TechPage {}).viewer(viewer.as_ref())
}
