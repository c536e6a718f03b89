//! Handler bodies shared by the client and store endpoints.
//!
//! The route modules ([`super::user_clients`], [`super::user_stores`]) own
//! the Actix attributes and OpenAPI annotations; each delegates here with its
//! document type fixed.

use actix_web::HttpResponse;
use pagination::{ListEnvelope, PageRequest};

use crate::domain::ports::DepositRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts_dto::{AccountResource, DepositBody, ListQuery};
use crate::inbound::http::state::{AccountPorts, AccountPortsFor, HttpState};

fn ports<D>(state: &HttpState) -> &AccountPorts<D>
where
    D: AccountResource,
    HttpState: AccountPortsFor<D>,
{
    AccountPortsFor::<D>::ports(state)
}

pub(crate) async fn list<D>(state: &HttpState, query: ListQuery) -> ApiResult<HttpResponse>
where
    D: AccountResource,
    HttpState: AccountPortsFor<D>,
{
    let request = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());
    let page = ports::<D>(state).query.list(request).await?;
    let envelope = ListEnvelope::new(
        D::KIND.list_message(),
        page.map(|account| D::respond(&account)),
    );
    Ok(HttpResponse::Ok().json(envelope))
}

pub(crate) async fn create<D>(state: &HttpState, body: D::Create) -> ApiResult<HttpResponse>
where
    D: AccountResource,
    HttpState: AccountPortsFor<D>,
{
    let account = ports::<D>(state).command.create(D::draft(body)).await?;
    Ok(HttpResponse::Created().json(D::respond(&account)))
}

pub(crate) async fn find<D>(state: &HttpState, id: &str) -> ApiResult<HttpResponse>
where
    D: AccountResource,
    HttpState: AccountPortsFor<D>,
{
    let account = ports::<D>(state).query.find(id).await?;
    Ok(HttpResponse::Ok().json(D::respond(&account)))
}

pub(crate) async fn update<D>(
    state: &HttpState,
    id: String,
    body: D::Update,
) -> ApiResult<HttpResponse>
where
    D: AccountResource,
    HttpState: AccountPortsFor<D>,
{
    let account = ports::<D>(state).command.update(D::update(id, body)).await?;
    Ok(HttpResponse::Ok().json(D::respond(&account)))
}

pub(crate) async fn delete<D>(state: &HttpState, id: &str) -> ApiResult<HttpResponse>
where
    D: AccountResource,
    HttpState: AccountPortsFor<D>,
{
    ports::<D>(state).command.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub(crate) async fn deposit<D>(
    state: &HttpState,
    id: String,
    body: DepositBody,
) -> ApiResult<HttpResponse>
where
    D: AccountResource,
    HttpState: AccountPortsFor<D>,
{
    let request = DepositRequest {
        id,
        amount: body.amount,
    };
    let account = ports::<D>(state).command.deposit(request).await?;
    Ok(HttpResponse::Ok().json(D::respond(&account)))
}
