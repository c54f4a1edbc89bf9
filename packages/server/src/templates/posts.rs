use serde::Serialize;

use super::Template;
use super::html::{comment_list, date, e, form, linebreaks, post_list};
use crate::models::comment::CommentView;
use crate::models::form::FormView;
use crate::models::post::{GroupView, PostView, UserView};
use crate::models::shared::PageObj;

#[derive(Serialize)]
pub struct IndexPage {
    pub page_obj: PageObj<PostView>,
}

impl Template for IndexPage {
    const NAME: &'static str = "posts/index.html";

    fn title(&self) -> String {
        "Latest updates on the site".into()
    }

    fn body(&self) -> String {
        format!(
            "<h1>Latest updates on the site</h1>\n{}",
            post_list(&self.page_obj, true)
        )
    }
}

#[derive(Serialize)]
pub struct GroupPage {
    pub group: GroupView,
    pub page_obj: PageObj<PostView>,
}

impl Template for GroupPage {
    const NAME: &'static str = "posts/group_list.html";

    fn title(&self) -> String {
        format!("Posts of the group {}", self.group.title)
    }

    fn body(&self) -> String {
        format!(
            "<h1>{}</h1>\n<p>{}</p>\n{}",
            e(&self.group.title),
            linebreaks(&self.group.description),
            post_list(&self.page_obj, false)
        )
    }
}

#[derive(Serialize)]
pub struct ProfilePage {
    pub author: UserView,
    pub posts_count: u64,
    /// Whether the viewer follows `author`.
    pub following: bool,
    /// Whether the viewer may follow `author` at all.
    pub can_follow: bool,
    pub page_obj: PageObj<PostView>,
}

impl Template for ProfilePage {
    const NAME: &'static str = "posts/profile.html";

    fn title(&self) -> String {
        format!("Profile of {}", self.author.username)
    }

    fn body(&self) -> String {
        let username = e(&self.author.username);
        let button = match (self.can_follow, self.following) {
            (false, _) => String::new(),
            (true, true) => {
                format!(r#"<a class="button" href="/profile/{username}/unfollow/">Unfollow</a>"#)
            }
            (true, false) => {
                format!(r#"<a class="button" href="/profile/{username}/follow/">Follow</a>"#)
            }
        };

        format!(
            "<h1>All posts of {username}</h1>\n<h3>Posts: {}</h3>\n{button}\n{}",
            self.posts_count,
            post_list(&self.page_obj, true)
        )
    }
}

#[derive(Serialize)]
pub struct PostDetailPage {
    pub post: PostView,
    /// Number of posts by the post's author.
    pub posts_count: u64,
    pub comments: Vec<CommentView>,
    pub form: FormView,
    /// Whether the viewer wrote the post.
    pub is_author: bool,
    pub can_comment: bool,
}

impl Template for PostDetailPage {
    const NAME: &'static str = "posts/post_detail.html";

    fn title(&self) -> String {
        let preview: String = self.post.text.chars().take(30).collect();
        format!("Post {preview}")
    }

    fn body(&self) -> String {
        let post = &self.post;

        let group = post
            .group
            .as_ref()
            .map(|g| {
                format!(
                    r#"<li>Group: {0} <a href="/group/{1}/">all posts of the group</a></li>"#,
                    e(&g.title),
                    e(&g.slug)
                )
            })
            .unwrap_or_default();

        let image = post
            .image
            .as_deref()
            .map(|name| format!(r#"<img class="card-img" src="/media/{}" alt="">"#, e(name)))
            .unwrap_or_default();

        let author_actions = if self.is_author {
            format!(
                r#"<a class="button" href="/posts/{0}/edit/">Edit</a>
<form method="post" action="/posts/{0}/delete/"><button type="submit">Delete</button></form>"#,
                post.id
            )
        } else {
            String::new()
        };

        let comment_form = if self.can_comment {
            format!(
                "<h5>Add a comment:</h5>\n{}",
                form(
                    &self.form,
                    &format!("/posts/{}/comment/", post.id),
                    false,
                    "Send",
                    ""
                )
            )
        } else {
            String::new()
        };

        format!(
            r#"<aside>
  <ul>
    <li>Date: {date}</li>
    {group}
    <li>Author: <a href="/profile/{username}/">{username}</a></li>
    <li>Posts by the author: <span>{count}</span></li>
  </ul>
</aside>
<article>
  {image}
  <p>{text}</p>
  {author_actions}
</article>
{comment_form}
{comments}"#,
            date = date(&post.pub_date),
            username = e(&post.author.username),
            count = self.posts_count,
            text = linebreaks(&post.text),
            comments = comment_list(&self.comments),
        )
    }
}

#[derive(Serialize)]
pub struct CreatePostPage {
    pub form: FormView,
    pub is_edit: bool,
    pub post_id: Option<i32>,
}

impl Template for CreatePostPage {
    const NAME: &'static str = "posts/create_post.html";

    fn title(&self) -> String {
        if self.is_edit {
            "Edit post".into()
        } else {
            "New post".into()
        }
    }

    fn body(&self) -> String {
        let (action, submit) = match self.post_id {
            Some(id) if self.is_edit => (format!("/posts/{id}/edit/"), "Save"),
            _ => ("/create/".to_string(), "Add"),
        };
        format!(
            "<h1>{}</h1>\n{}",
            e(&self.title()),
            form(&self.form, &action, true, submit, "")
        )
    }
}

#[derive(Serialize)]
pub struct FollowPage {
    pub page_obj: PageObj<PostView>,
}

impl Template for FollowPage {
    const NAME: &'static str = "posts/follow.html";

    fn title(&self) -> String {
        "Posts of your subscriptions".into()
    }

    fn body(&self) -> String {
        let list = if self.page_obj.is_empty() {
            "<p>No posts from the authors you follow yet.</p>".to_string()
        } else {
            post_list(&self.page_obj, true)
        };
        format!("<h1>Posts of your subscriptions</h1>\n{list}")
    }
}
