use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use common::storage::name::{ALTERNATIVE_SUFFIX_LEN, MAX_NAME_LEN, sanitize_filename};
use serde::Serialize;

use crate::entity::{group, post, user};
use crate::error::AppError;
use crate::models::form::{
    FieldErrors, FieldKind, FieldView, FormView, REQUIRED, Widget, add_error,
};
use crate::utils::image::validate_image;

/// Directory, relative to the media root, post images are stored in.
pub const IMAGE_UPLOAD_DIR: &str = "posts";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: i32,
    pub username: String,
}

impl From<&user::Model> for UserView {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<&group::Model> for GroupView {
    fn from(group: &group::Model) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        }
    }
}

/// A post with its author and group resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: UserView,
    pub group: Option<GroupView>,
    /// Storage name of the image, e.g. `posts/cat.gif`.
    pub image: Option<String>,
}

impl PostView {
    pub fn new(post: post::Model, author: UserView, group: Option<GroupView>) -> Self {
        Self {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            author,
            group,
            image: post.image,
        }
    }
}

/// An image file as received from the browser.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Bytes,
}

/// Raw values of a submitted post form.
#[derive(Clone, Debug, Default)]
pub struct PostFormData {
    pub text: String,
    pub group: String,
    pub image: Option<UploadedImage>,
}

/// A validated image ready to be stored under `name`.
#[derive(Clone, Debug)]
pub struct CleanImage {
    pub name: String,
    pub data: Bytes,
}

/// Post form values after validation.
#[derive(Clone, Debug)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<CleanImage>,
}

impl PostFormData {
    /// Read the `text`, `group` and `image` fields of a multipart body.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut data = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some("text") => {
                    data.text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read text: {e}")))?;
                }
                Some("group") => {
                    data.group = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read group: {e}")))?;
                }
                Some("image") => {
                    let filename = field.file_name().map(|s| s.to_string());
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                    // Browsers send an empty part when no file was chosen.
                    if let Some(filename) = filename
                        && !filename.is_empty()
                    {
                        data.image = Some(UploadedImage {
                            filename,
                            data: bytes,
                        });
                    }
                }
                _ => {} // Ignore unknown fields.
            }
        }

        Ok(data)
    }

    pub fn clean(&self, groups: &[GroupView], max_image_size: u64) -> Result<CleanPost, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.text.trim().is_empty() {
            add_error(&mut errors, "text", REQUIRED);
        }

        let group_id = match self.group.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    add_error(
                        &mut errors,
                        "group",
                        "Select a valid choice. That choice is not one of the available choices.",
                    );
                    None
                }
            },
        };

        let image = match &self.image {
            None => None,
            Some(upload) => match clean_image(upload, max_image_size) {
                Ok(image) => Some(image),
                Err(message) => {
                    add_error(&mut errors, "image", message);
                    None
                }
            },
        };

        if errors.is_empty() {
            Ok(CleanPost {
                text: self.text.clone(),
                group_id,
                image,
            })
        } else {
            Err(errors)
        }
    }
}

fn clean_image(upload: &UploadedImage, max_size: u64) -> Result<CleanImage, String> {
    if upload.data.is_empty() {
        return Err("The submitted file is empty.".into());
    }
    if upload.data.len() as u64 > max_size {
        return Err(format!(
            "Ensure this file is at most {max_size} bytes (it is {}).",
            upload.data.len()
        ));
    }
    // Leave room for the directory and a possible rename suffix.
    let max_len = MAX_NAME_LEN - IMAGE_UPLOAD_DIR.len() - 1 - ALTERNATIVE_SUFFIX_LEN;
    let filename = sanitize_filename(&upload.filename, max_len)
        .ok_or_else(|| "The submitted file has no usable name.".to_string())?;
    validate_image(&filename, &upload.data)?;

    Ok(CleanImage {
        name: format!("{IMAGE_UPLOAD_DIR}/{filename}"),
        data: upload.data.clone(),
    })
}

/// The create/edit post form, pre-filled with `text`, `group` and the
/// current image name.
pub fn post_form(
    groups: &[GroupView],
    text: Option<String>,
    group: Option<String>,
    image: Option<String>,
) -> FormView {
    let choices = groups
        .iter()
        .map(|g| (g.id.to_string(), g.title.clone()));

    FormView::new(vec![
        FieldView::new("text", "Post text", FieldKind::CharField, Widget::Textarea)
            .required()
            .help("Text of the new post")
            .value(text),
        FieldView::new("group", "Group", FieldKind::ChoiceField, Widget::Select)
            .help("Group the post will belong to")
            .value(group)
            .choices(choices),
        FieldView::new("image", "Image", FieldKind::ImageField, Widget::FileInput)
            .help("Picture attached to the post")
            .value(image),
    ])
}
