use super::{Store, StoreError};
use crate::models::{AccountId, MAX_POST_LEN, Post, PostId};
use tracing::info;

impl Store {
    /// Stores a new post under the next post id.
    pub fn create_post(&self, author_id: AccountId, body: &str) -> Result<Post, StoreError> {
        if body.len() > MAX_POST_LEN {
            return Err(StoreError::TooLong {
                len: body.len(),
                max: MAX_POST_LEN,
            });
        }

        let mut state = self.write()?;
        let snapshot = &mut state.snapshot;
        let post = Post {
            body: body.to_string(),
            id: snapshot.next_post_id,
            author_id,
        };
        snapshot.next_post_id += 1;
        snapshot.posts.insert(post.id, post.clone());
        self.mark_dirty(&mut state);

        info!("Post created: {} by account {}", post.id, author_id);
        Ok(post)
    }

    pub fn get_post(&self, id: PostId) -> Result<Post, StoreError> {
        self.read()?
            .snapshot
            .posts
            .get(&id)
            .cloned()
            .ok_or(StoreError::PostNotFound(id))
    }

    /// All posts in ascending id order, read after reloading the snapshot file.
    pub fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.reload()?;
        let state = self.read()?;

        Ok(state.snapshot.posts.values().cloned().collect())
    }

    /// Posts by one author in ascending id order, read after reloading the snapshot file.
    pub fn list_posts_by_author(&self, author_id: AccountId) -> Result<Vec<Post>, StoreError> {
        self.reload()?;
        let state = self.read()?;

        Ok(state
            .snapshot
            .posts
            .values()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect())
    }

    /// Replaces the body of a post owned by `caller`. The length limit only
    /// applies at creation.
    pub fn update_post(
        &self,
        id: PostId,
        body: &str,
        caller: AccountId,
    ) -> Result<Post, StoreError> {
        let mut state = self.write()?;
        let post = state
            .snapshot
            .posts
            .get_mut(&id)
            .ok_or(StoreError::PostNotFound(id))?;

        if post.author_id != caller {
            return Err(StoreError::NotAuthor { post: id, caller });
        }

        post.body = body.to_string();
        let post = post.clone();
        self.mark_dirty(&mut state);

        info!("Post updated: {} by account {}", id, caller);
        Ok(post)
    }

    /// Removes a post owned by `caller`.
    pub fn delete_post(&self, id: PostId, caller: AccountId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let post = state
            .snapshot
            .posts
            .get(&id)
            .ok_or(StoreError::PostNotFound(id))?;

        if post.author_id != caller {
            return Err(StoreError::NotAuthor { post: id, caller });
        }

        state.snapshot.posts.remove(&id);
        self.mark_dirty(&mut state);

        info!("Post deleted: {} by account {}", id, caller);
        Ok(())
    }
}
