//! Request handlers shared by the users and roles managers.
//!
//! Each handler calls the facade, then rewrites the cache synchronously
//! once the call resolves. A failed call leaves the cached list exactly as
//! it was and raises a [`Notice`]; nothing is rolled back because nothing
//! was written before the facade answered.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::EntityApi;
use crate::cache::QueryCache;
use crate::error::AdminError;
use crate::form::{FormController, FormEntity, FormOptions, Submission};
use crate::model::Entity;
use crate::request::{Action, DeleteReq, EditReq, SubmitReq};
use crate::router::{Payload, Router};
use crate::state::Notice;

/// Handle `{kind}/load`: fetch the list into the cache.
pub async fn handle_load<E: Entity>(api: &dyn EntityApi<E>, cache: &QueryCache) {
    match api.list().await {
        Ok(items) => {
            info!(kind = E::KIND, count = items.len(), "list loaded");
            cache.set_list(items);
        }
        Err(err) => raise(cache, &err),
    }
}

/// Handle `{kind}/refresh`: refetch and overwrite whatever the cache holds.
///
/// Corrects drift left by mutations whose rewrite never happened.
pub async fn handle_refresh<E: Entity>(api: &dyn EntityApi<E>, cache: &QueryCache) {
    let before = cache.list::<E>().len();
    match api.list().await {
        Ok(items) => {
            info!(kind = E::KIND, before, after = items.len(), "list reconciled");
            cache.set_list(items);
        }
        Err(err) => raise(cache, &err),
    }
}

/// Handle `{kind}/add`.
pub fn handle_add<E: FormEntity>(cache: &QueryCache) {
    update_form::<E, _>(cache, FormController::<E>::open_create);
}

/// Handle `{kind}/edit`: select a cached record.
pub fn handle_edit<E: FormEntity>(req: &EditReq, cache: &QueryCache) {
    match cache.find::<E>(req.id) {
        Some(entity) => update_form::<E, _>(cache, |form| form.open_edit(entity)),
        None => raise(cache, &AdminError::not_found(E::LABEL, req.id)),
    }
}

/// Handle `{kind}/dismiss`.
pub fn handle_dismiss<E: FormEntity>(cache: &QueryCache) {
    update_form::<E, _>(cache, FormController::<E>::dismiss);
}

/// Handle `{kind}/submit`: create or update depending on the form mode.
pub async fn handle_submit<E: FormEntity>(
    req: &SubmitReq,
    api: &dyn EntityApi<E>,
    cache: &QueryCache,
    options: &FormOptions,
) {
    let form = cache
        .get_as::<FormController<E>>(&FormController::<E>::path())
        .unwrap_or_default();

    let submission = match form.prepare(&req.fields, options) {
        Ok(submission) => submission,
        Err(err) => {
            debug!(kind = E::KIND, %err, "submit rejected");
            update_form::<E, _>(cache, |form| form.reject(&err));
            return;
        }
    };

    update_form::<E, _>(cache, FormController::<E>::begin);

    let outcome = match submission {
        Submission::Create(fields) => api.create(fields).await.map(|created| {
            let id = created.id();
            if cache.apply_created(created) {
                info!(kind = E::KIND, %id, "created");
            } else {
                info!(kind = E::KIND, %id, "created; list not loaded yet");
            }
        }),
        Submission::Update(entity) => api.update(entity).await.map(|updated| {
            let id = updated.id();
            if cache.apply_updated(updated) {
                info!(kind = E::KIND, %id, "updated");
            } else {
                warn!(kind = E::KIND, %id, "updated record is not cached");
            }
        }),
    };

    match outcome {
        Ok(()) => update_form::<E, _>(cache, FormController::<E>::complete),
        Err(err) => {
            update_form::<E, _>(cache, FormController::<E>::abort);
            raise(cache, &err);
        }
    }
}

/// Handle `{kind}/delete`.
pub async fn handle_delete<E: Entity>(req: &DeleteReq, api: &dyn EntityApi<E>, cache: &QueryCache) {
    match api.delete(req.id).await {
        Ok(id) => {
            let removed = cache.apply_deleted::<E>(id);
            info!(kind = E::KIND, %id, removed, "deleted");
        }
        Err(err) => raise(cache, &err),
    }
}

/// Register all requests for entity type `E` with `router`.
pub fn register<E: FormEntity>(router: &Router, api: Arc<dyn EntityApi<E>>, options: Arc<FormOptions>) {
    // {kind}/load
    {
        let api = api.clone();
        router.on(&Action::Load.path::<E>(), move |_, _, cache: Arc<QueryCache>| {
            let api = api.clone();
            async move {
                handle_load(api.as_ref(), &cache).await;
            }
        });
    }

    // {kind}/refresh
    {
        let api = api.clone();
        router.on(&Action::Refresh.path::<E>(), move |_, _, cache: Arc<QueryCache>| {
            let api = api.clone();
            async move {
                handle_refresh(api.as_ref(), &cache).await;
            }
        });
    }

    // {kind}/add
    router.on(&Action::Add.path::<E>(), |_, _, cache: Arc<QueryCache>| async move {
        handle_add::<E>(&cache);
    });

    // {kind}/edit
    router.on(&Action::Edit.path::<E>(), |path, payload, cache: Arc<QueryCache>| async move {
        if let Some(req) = downcast::<EditReq>(&path, &payload) {
            handle_edit::<E>(req, &cache);
        }
    });

    // {kind}/dismiss
    router.on(&Action::Dismiss.path::<E>(), |_, _, cache: Arc<QueryCache>| async move {
        handle_dismiss::<E>(&cache);
    });

    // {kind}/submit
    {
        let api = api.clone();
        router.on(&Action::Submit.path::<E>(), move |path, payload, cache: Arc<QueryCache>| {
            let api = api.clone();
            let options = options.clone();
            async move {
                if let Some(req) = downcast::<SubmitReq>(&path, &payload) {
                    handle_submit(req, api.as_ref(), &cache, &options).await;
                }
            }
        });
    }

    // {kind}/delete
    router.on(&Action::Delete.path::<E>(), move |path, payload, cache: Arc<QueryCache>| {
        let api = api.clone();
        async move {
            if let Some(req) = downcast::<DeleteReq>(&path, &payload) {
                handle_delete(req, api.as_ref(), &cache).await;
            }
        }
    });
}

fn update_form<E: FormEntity, F: FnOnce(&mut FormController<E>)>(cache: &QueryCache, f: F) {
    cache.modify::<FormController<E>, _>(&FormController::<E>::path(), |mut form| {
        f(&mut form);
        form
    });
}

fn raise(cache: &QueryCache, err: &AdminError) {
    warn!(code = err.error_code(), %err, "request failed");
    cache.set(Notice::PATH, Notice::from_error(err));
}

fn downcast<'a, T: 'static>(path: &str, payload: &'a Payload) -> Option<&'a T> {
    let req = payload.downcast_ref::<T>();
    if req.is_none() {
        warn!(path, expected = std::any::type_name::<T>(), "unexpected payload type");
    }
    req
}
