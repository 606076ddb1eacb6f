use std::cell::Cell;
use std::rc::Rc;

use gloo_net::http::Request;
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const LISTINGS_ENDPOINT: &str = "/api/properties";
const HERO_IMAGE: &str =
    "https://images.unsplash.com/photo-1505691938895-1758d7feb511?auto=format&fit=crop&w=1600&q=80";
const FILTERS: &[&str] = &["Top Villa", "Self Checkin", "Free Parking", "Pet Friendly"];
const LOADING_TEXT: &str = "Loading properties...";

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Address {
    city: String,
    country: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Property {
    #[allow(dead_code)]
    id: String,
    name: String,
    image: String,
    address: Address,
    #[serde(default)]
    category: Vec<String>,
    price: f64,
    rating: f64,
}

impl Property {
    /// Case-sensitive exact match against the category labels.
    fn in_category(&self, label: &str) -> bool {
        self.category.iter().any(|c| c == label)
    }
}

// The page treats every variant the same; the detail only reaches the console.
#[derive(Debug, Error)]
enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] gloo_net::Error),
    #[error("HTTP {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("malformed listings payload: {0}")]
    Decode(#[from] serde_json::Error),
}

fn decode_listings(body: &str) -> Result<Vec<Property>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Single GET, no retry, no timeout.
async fn fetch_listings(endpoint: &str) -> Result<Vec<Property>, FetchError> {
    let resp = Request::get(endpoint)
        .send()
        .await
        .map_err(FetchError::Network)?;

    if !resp.ok() {
        return Err(FetchError::Status {
            status: resp.status(),
            status_text: resp.status_text(),
        });
    }

    let body = resp.text().await.map_err(FetchError::Network)?;
    decode_listings(&body)
}

#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Pending,
    Settled(Rc<Vec<Property>>),
}

impl LoadState {
    fn settle(result: Result<Vec<Property>, FetchError>) -> Self {
        Self::settle_with(result, |e| log::error!("Failed to fetch properties: {e}"))
    }

    /// A failed fetch goes to `report` once and settles to an empty list.
    fn settle_with(result: Result<Vec<Property>, FetchError>, report: impl FnOnce(&FetchError)) -> Self {
        match result {
            Ok(listings) => {
                log::debug!("loaded {} properties", listings.len());
                LoadState::Settled(Rc::new(listings))
            }
            Err(e) => {
                report(&e);
                LoadState::Settled(Rc::default())
            }
        }
    }
}

/// At most one active label, stored as an index into `FILTERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FilterState {
    active: Option<usize>,
}

impl FilterState {
    fn active(&self) -> Option<&'static str> {
        self.active.map(|i| FILTERS[i])
    }

    fn is_active(&self, label: &str) -> bool {
        self.active() == Some(label)
    }

    /// Clears `label` if active, otherwise makes it the only active filter.
    /// Labels outside `FILTERS` are ignored.
    fn toggle(self, label: &str) -> Self {
        let Some(idx) = FILTERS.iter().position(|l| *l == label) else {
            log::warn!("ignoring unknown filter label {label:?}");
            return self;
        };
        let active = if self.active == Some(idx) { None } else { Some(idx) };
        Self { active }
    }
}

fn visible<'a>(listings: &'a [Property], filter: Option<&str>) -> Vec<&'a Property> {
    match filter {
        None => listings.iter().collect(),
        Some(label) => listings.iter().filter(|p| p.in_category(label)).collect(),
    }
}

#[derive(Properties, PartialEq)]
struct PillProps {
    label: AttrValue,
    #[prop_or_default]
    active: bool,
    onclick: Callback<MouseEvent>,
}

#[function_component(Pill)]
fn pill(props: &PillProps) -> Html {
    let class = classes!("pill", props.active.then_some("pill-active"));

    html! {
        <button type="button" {class} aria-pressed={props.active.to_string()} onclick={props.onclick.clone()}>
            { props.label.clone() }
        </button>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("storefront starting");
    yew::Renderer::<App>::new().render();
}

#[function_component(App)]
fn app() -> Html {
    let load = use_state(|| LoadState::Pending);
    let filter = use_state(FilterState::default);

    // Fetch once on mount. A result arriving after unmount is dropped.
    {
        let load = load.clone();
        use_effect_with((), move |_| {
            let mounted = Rc::new(Cell::new(true));
            {
                let mounted = mounted.clone();
                spawn_local(async move {
                    let settled = LoadState::settle(fetch_listings(LISTINGS_ENDPOINT).await);
                    if mounted.get() {
                        load.set(settled);
                    }
                });
            }
            move || mounted.set(false)
        });
    }

    html! {
        <div class="page">
            <section class="hero" style={format!("background-image: url('{HERO_IMAGE}');")}>
                <h1 class="hero-title">{ "Find your favorite place here!" }</h1>
                <p class="hero-subtitle">{ "The best prices for over 2 million properties worldwide." }</p>
            </section>

            <section class="filters">
                <div class="filter-row">
                    { for FILTERS.iter().map(|&label| {
                        let active = filter.is_active(label);
                        let filter = filter.clone();
                        html! {
                            <Pill
                                key={label}
                                label={label}
                                {active}
                                onclick={Callback::from(move |_| filter.set((*filter).toggle(label)))}
                            />
                        }
                    }) }
                </div>
            </section>

            { listings_section(&load, filter.active()) }
        </div>
    }
}

fn listings_section(state: &LoadState, active: Option<&str>) -> Html {
    let LoadState::Settled(listings) = state else {
        return html! {
            <section class="listings">
                <p class="loading">{ LOADING_TEXT }</p>
            </section>
        };
    };

    // Keyed by position: ids come from the server unchecked.
    html! {
        <section class="listings">
            { for visible(listings, active).into_iter().enumerate().map(|(i, p)| html! {
                <div class="card" key={i}>
                    <img class="card-img" src={p.image.clone()} alt={p.name.clone()} />
                    <div class="card-body">
                        <h3 class="card-title">{ p.name.clone() }</h3>
                        <p class="card-location">{ format!("{}, {}", p.address.city, p.address.country) }</p>
                        <div class="card-meta">
                            <span class="card-price">{ format!("${}", p.price) }</span>
                            <span class="card-rating">{ format!("⭐ {}", p.rating) }</span>
                        </div>
                    </div>
                </div>
            }) }
        </section>
    }
}
