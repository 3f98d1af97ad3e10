use super::{message, non_blank, parse_date, positive_amount, required, required_text, MessageResponse};
use crate::{
    error::{AppError, AppResult},
    extract::{JsonBody, QueryParams},
    models::{Sponsor, SponsorshipContribution},
    repo::{
        clubs,
        sponsors::{self, NewSponsor, SponsorSearch},
    },
    DbPool,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

/// A contribution as seen by a club, with the sponsor's contact details inlined.
#[derive(Debug, Serialize)]
struct Sponsorship {
    sponsorship_id: i32,
    #[serde(flatten)]
    sponsor: Sponsor,
    contribution_amount: f64,
    contribution_date: NaiveDate,
}

impl From<(SponsorshipContribution, Sponsor)> for Sponsorship {
    fn from((contribution, sponsor): (SponsorshipContribution, Sponsor)) -> Self {
        Self {
            sponsorship_id: contribution.id,
            sponsor,
            contribution_amount: contribution.contribution_amount,
            contribution_date: contribution.contribution_date,
        }
    }
}

#[derive(Serialize)]
struct SponsorsResponse<T> {
    sponsors: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct SponsorSearchParams {
    sponsor_name: Option<String>,
    contact_person: Option<String>,
    contact_email: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
}

impl SponsorSearchParams {
    fn into_search(self) -> AppResult<SponsorSearch> {
        Ok(SponsorSearch {
            sponsor_name: non_blank(self.sponsor_name),
            contact_person: non_blank(self.contact_person),
            contact_email: non_blank(self.contact_email),
            from_date: parse_date(self.from_date, "from_date")?,
            to_date: parse_date(self.to_date, "to_date")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct SponsorshipRequest {
    sponsor_name: Option<String>,
    contact_person: Option<String>,
    contact_email: Option<String>,
    phone_number: Option<String>,
    address: Option<String>,
    contribution_amount: Option<f64>,
    contribution_date: Option<String>,
}

struct NewSponsorship {
    sponsor: NewSponsor,
    amount: f64,
    date: NaiveDate,
}

impl SponsorshipRequest {
    fn validate(self) -> AppResult<NewSponsorship> {
        let sponsor_name = required_text(self.sponsor_name, "sponsor_name")?;
        let amount = positive_amount(self.contribution_amount, "contribution_amount")?;
        let date = required(
            parse_date(self.contribution_date, "contribution_date")?,
            "contribution_date",
        )?;
        Ok(NewSponsorship {
            sponsor: NewSponsor {
                sponsor_name,
                contact_person: non_blank(self.contact_person),
                contact_email: non_blank(self.contact_email),
                phone_number: non_blank(self.phone_number),
                address: non_blank(self.address),
            },
            amount,
            date,
        })
    }
}

async fn all(Extension(pool): Extension<DbPool>) -> AppResult<Json<SponsorsResponse<Sponsor>>> {
    let conn = &mut pool.get().await?;

    Ok(Json(SponsorsResponse {
        sponsors: sponsors::list(conn).await?,
    }))
}

async fn load(
    pool: &DbPool,
    club_id: i32,
    filter: &SponsorSearch,
) -> AppResult<Json<SponsorsResponse<Sponsorship>>> {
    let conn = &mut pool.get().await?;

    let rows = sponsors::contributions(conn, club_id, filter).await?;
    Ok(Json(SponsorsResponse {
        sponsors: rows.into_iter().map(Sponsorship::from).collect(),
    }))
}

async fn list(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
) -> AppResult<Json<SponsorsResponse<Sponsorship>>> {
    load(&pool, club_id, &SponsorSearch::default()).await
}

async fn search(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    QueryParams(params): QueryParams<SponsorSearchParams>,
) -> AppResult<Json<SponsorsResponse<Sponsorship>>> {
    let filter = params.into_search()?;
    load(&pool, club_id, &filter).await
}

async fn create(
    Extension(pool): Extension<DbPool>,
    Path(club_id): Path<i32>,
    JsonBody(req): JsonBody<SponsorshipRequest>,
) -> AppResult<(StatusCode, Json<Sponsorship>)> {
    let new = req.validate()?;
    let conn = &mut pool.get().await?;

    let sponsorship = conn
        .transaction::<_, AppError, _>(move |conn| {
            async move {
                if !clubs::exists(conn, club_id).await? {
                    return Err(AppError::not_found("Club not found"));
                }

                let sponsor = match sponsors::find_by_name(conn, &new.sponsor.sponsor_name).await? {
                    Some(sponsor) => sponsor,
                    None => {
                        tracing::info!(sponsor_name = %new.sponsor.sponsor_name, "registering new sponsor");
                        sponsors::insert(conn, &new.sponsor).await?
                    }
                };

                let contribution =
                    sponsors::insert_contribution(conn, sponsor.id, club_id, new.amount, new.date)
                        .await?;
                Ok(Sponsorship::from((contribution, sponsor)))
            }
            .scope_boxed()
        })
        .await?;
    tracing::info!(
        club_id,
        sponsorship_id = sponsorship.sponsorship_id,
        amount = sponsorship.contribution_amount,
        "recorded sponsorship"
    );

    Ok((StatusCode::CREATED, Json(sponsorship)))
}

async fn remove(
    Extension(pool): Extension<DbPool>,
    Path((club_id, sponsorship_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    if sponsors::delete_contribution(conn, club_id, sponsorship_id).await? == 0 {
        return Err(AppError::not_found("Sponsorship not found"));
    }

    Ok(message("Sponsorship deleted successfully"))
}

pub fn app() -> Router {
    Router::new()
        .route("/sponsors", get(all))
        .route("/clubs/:club_id/sponsors", get(list).post(create))
        .route("/clubs/:club_id/sponsors/search", get(search))
        .route("/clubs/:club_id/sponsors/:sponsorship_id", delete(remove))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sponsorship_needs_name_amount_and_date() {
        let req = SponsorshipRequest {
            sponsor_name: Some("Tech Corp".into()),
            contribution_amount: Some(1000.0),
            ..Default::default()
        };
        match req.validate() {
            Err(AppError::ResponseStatusError(code, msg)) => {
                assert_eq!(code, StatusCode::BAD_REQUEST);
                assert_eq!(msg, "contribution_date is required");
            }
            Err(other) => panic!("unexpected {other:?}"),
            Ok(_) => panic!("accepted a sponsorship without a date"),
        }

        let new = SponsorshipRequest {
            sponsor_name: Some(" Tech Corp ".into()),
            contact_email: Some("".into()),
            contribution_amount: Some(1000.0),
            contribution_date: Some("2024-11-15".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(new.sponsor.sponsor_name, "Tech Corp");
        assert_eq!(new.sponsor.contact_email, None);
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2024, 11, 15).unwrap());
    }

    #[test]
    fn bad_search_dates_are_rejected() {
        let err = SponsorSearchParams {
            from_date: Some("last week".into()),
            ..Default::default()
        }
        .into_search()
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn sponsorship_json_inlines_the_sponsor() {
        let sponsorship = Sponsorship::from((
            SponsorshipContribution {
                id: 7,
                sponsor_id: 2,
                club_id: 1,
                contribution_amount: 1500.0,
                contribution_date: NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
            },
            Sponsor {
                id: 2,
                sponsor_name: "Innovate Ltd".into(),
                contact_person: Some("Jane Roe".into()),
                contact_email: Some("jane.roe@innovateltd.com".into()),
                phone_number: None,
                address: None,
            },
        ));
        let json = serde_json::to_value(&sponsorship).unwrap();
        assert_eq!(json["sponsorship_id"], 7);
        assert_eq!(json["sponsor_id"], 2);
        assert_eq!(json["sponsor_name"], "Innovate Ltd");
        assert_eq!(json["contribution_date"], "2024-11-15");
    }
}
