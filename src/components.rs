//! Yew view components for the site.
//!
//! Page sections render content from the catalog and report user intent upward as
//! [`SiteCommand`]s; overlays (forms, product/news modals, dialogs, notices) are driven by
//! the state owned by the application root.

use fincomercio_web::bridge::SiteCommand;
use fincomercio_web::carousel::{Carousel, CarouselAction};
use fincomercio_web::chatbot::Chatbot;
use fincomercio_web::content::{NewsItem, Product, SiteContent};
use fincomercio_web::defaults::{AUTOPLAY_MS, NOTICE_LIFETIME_MS};
use fincomercio_web::forms::{
    empty_data, is_required, newsletter_fields, validate, FieldKind, FieldMark, FieldSpec,
    FormKind, VehicleSection, VEHICLE_YEAR_FIELD,
};
use fincomercio_web::modal::is_backdrop_click;
use fincomercio_web::notice::{Confirmation, Notice, NoticeKind};
use fincomercio_web::panel::PanelToggle;
use fincomercio_web::parallax_offset;
use fincomercio_web::site::InsurancePreset;
use fincomercio_web::submission::{Effect, SubmitError};
use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::rc::Rc;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config::{
    CARD_HOVER_TRANSFORM, CARD_REST_TRANSFORM, LOADER_FADE_MS, LOADER_HOLD_MS, REVEAL_CLASS,
};
use crate::hooks::{
    use_event_listener, use_interval, use_reveal, use_scroll_y, use_submission, ListenOn,
};
use crate::utils::{document_loaded, event_within, smooth_scroll_to};

/// Fields of the insurance form that live inside the vehicle section.
const VEHICLE_FIELDS: &[&str] = &[VEHICLE_YEAR_FIELD, "vehiclePlate"];

const NAV_LINKS: &[(&str, &str)] = &[
    ("#productos", "Productos"),
    ("#seguros", "Seguros"),
    ("#noticias", "Noticias"),
    ("#eventos", "Eventos"),
    ("#contacto", "Contacto"),
];

// ──────────────────────────────────────────────────────────────────────────────
// Shared pieces

/// Events are delegated to the application root, so `current_target` is never the overlay;
/// compare the click origin with the overlay element instead.
fn backdrop_clicked(e: &MouseEvent, backdrop: &NodeRef) -> bool {
    is_backdrop_click(
        e.target_dyn_into::<Element>().as_ref(),
        backdrop.cast::<Element>().as_ref(),
    )
}

#[derive(Properties, PartialEq)]
pub struct OverlayProps {
    #[prop_or_default]
    pub class: Classes,
    pub on_dismiss: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

/// Full-viewport backdrop with a centered content box. Clicking the backdrop itself
/// (not its content) dismisses it.
#[function_component(Overlay)]
pub fn overlay(props: &OverlayProps) -> Html {
    let backdrop = use_node_ref();
    let onclick = {
        let on_dismiss = props.on_dismiss.clone();
        let backdrop = backdrop.clone();
        Callback::from(move |e: MouseEvent| {
            if backdrop_clicked(&e, &backdrop) {
                on_dismiss.emit(());
            }
        })
    };
    html! {
        <div ref={backdrop} class={classes!("modal-overlay", props.class.clone())} {onclick}>
            <div class="modal-content">
                { props.children.clone() }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RevealProps {
    pub class: &'static str,
    #[prop_or_default]
    pub children: Html,
}

/// Block that gains the reveal class the first time it scrolls into view.
#[function_component(Reveal)]
pub fn reveal(props: &RevealProps) -> Html {
    let node = use_node_ref();
    let revealed = use_reveal(node.clone());
    html! {
        <div ref={node} class={classes!(props.class, revealed.then_some(REVEAL_CLASS))}>
            { props.children.clone() }
        </div>
    }
}

/// DOM id of a form field. The insurance selector and vehicle year keep their fixed ids.
fn field_id(kind: Option<FormKind>, name: &str) -> String {
    match kind {
        Some(FormKind::Insurance) if name == "insuranceType" || name == VEHICLE_YEAR_FIELD => {
            name.to_string()
        }
        Some(kind) => format!("{}-{}", kind.modal_id(), name),
        None => format!("newsletter-{}", name),
    }
}

fn render_field(
    id: String,
    spec: &FieldSpec,
    value: &str,
    mark: Option<FieldMark>,
    required: bool,
    on_field: &Callback<(&'static str, String)>,
) -> Html {
    let name = spec.name;
    let class = classes!("form-input", mark.map(FieldMark::class));
    let control = match spec.kind {
        FieldKind::Select(options) => {
            let onchange = on_field.reform(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                (name, select.value())
            });
            html! {
                <select id={id.clone()} {name} {class} {required} {onchange}>
                    { for options.iter().map(|&(option, label)| html! {
                        <option value={option} selected={option == value}>{ label }</option>
                    }) }
                </select>
            }
        }
        FieldKind::TextArea => {
            let oninput = on_field.reform(move |e: InputEvent| {
                let area: HtmlTextAreaElement = e.target_unchecked_into();
                (name, area.value())
            });
            html! {
                <textarea id={id.clone()} {name} {class} {required} rows="4"
                    value={value.to_string()} {oninput} />
            }
        }
        kind => {
            let input_type = match kind {
                FieldKind::Email => "email",
                FieldKind::Phone => "tel",
                FieldKind::Number => "number",
                FieldKind::Password => "password",
                _ => "text",
            };
            let oninput = on_field.reform(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                (name, input.value())
            });
            html! {
                <input type={input_type} id={id.clone()} {name} {class} {required}
                    value={value.to_string()} {oninput} />
            }
        }
    };
    html! {
        <div class="form-group" key={name}>
            <label for={id}>
                { spec.label }
                if required { <span class="required-mark">{ " *" }</span> }
            </label>
            { control }
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Header and navigation

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub on_command: Callback<SiteCommand>,
    pub on_search: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let menu = use_state(PanelToggle::mobile_menu);
    let button_ref = use_node_ref();
    let nav_ref = use_node_ref();

    {
        let menu = menu.clone();
        let button_ref = button_ref.clone();
        let nav_ref = nav_ref.clone();
        use_event_listener(
            ListenOn::Document,
            "click",
            Callback::from(move |e: Event| {
                let mut next = *menu;
                if next.close_on_outside_click(
                    event_within(&button_ref, &e),
                    event_within(&nav_ref, &e),
                ) {
                    menu.set(next);
                }
            }),
        );
    }

    let toggle_menu = {
        let menu = menu.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = *menu;
            next.toggle();
            menu.set(next);
        })
    };

    let open_contact = props
        .on_command
        .reform(|_: MouseEvent| SiteCommand::OpenForm(FormKind::Contact));
    let open_search = props.on_search.reform(|_: MouseEvent| ());

    html! {
        <header class="header">
            <div class="header-inner">
                <a class="logo" href="#inicio"
                    onclick={Callback::from(|e: MouseEvent| {
                        e.prevent_default();
                        smooth_scroll_to("#inicio");
                    })}>
                    { "Fincomercio" }
                </a>
                <nav ref={nav_ref} class={classes!("nav", menu.panel_flag())}>
                    <ul>
                        { for NAV_LINKS.iter().map(|&(href, label)| html! {
                            <li key={href}>
                                <a {href} onclick={Callback::from(move |e: MouseEvent| {
                                    e.prevent_default();
                                    smooth_scroll_to(href);
                                })}>{ label }</a>
                            </li>
                        }) }
                    </ul>
                </nav>
                <div class="header-actions">
                    <button class="search-btn" aria-label="Buscar" onclick={open_search}>{ "🔍" }</button>
                    <button class="btn-primary small" onclick={open_contact}>{ "Contáctanos" }</button>
                    <button ref={button_ref}
                        class={classes!("menu-btn", menu.trigger_flag())}
                        aria-label="Menú"
                        onclick={toggle_menu}>
                        <span></span><span></span><span></span>
                    </button>
                </div>
            </div>
        </header>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Hero carousel

#[derive(Properties, PartialEq)]
pub struct SectionProps {
    pub content: Rc<SiteContent>,
    pub on_command: Callback<SiteCommand>,
}

#[function_component(Hero)]
pub fn hero(props: &SectionProps) -> Html {
    let slides = &props.content.slides;
    let carousel = use_reducer({
        let count = slides.len();
        move || Carousel::new(count)
    });
    let scrolled = use_scroll_y();

    {
        let carousel = carousel.clone();
        use_interval(
            AUTOPLAY_MS,
            Callback::from(move |_| carousel.dispatch(CarouselAction::Tick)),
        );
    }

    let dispatch = |action: CarouselAction| {
        let carousel = carousel.clone();
        Callback::from(move |_: MouseEvent| carousel.dispatch(action))
    };

    let ontouchstart = {
        let carousel = carousel.clone();
        Callback::from(move |e: TouchEvent| {
            if let Some(touch) = e.touches().get(0) {
                carousel.dispatch(CarouselAction::PointerDown(touch.client_x() as f64));
            }
        })
    };
    let ontouchend = {
        let carousel = carousel.clone();
        Callback::from(move |e: TouchEvent| {
            if let Some(touch) = e.changed_touches().get(0) {
                carousel.dispatch(CarouselAction::PointerUp(touch.client_x() as f64));
            }
        })
    };
    let onmousedown = {
        let carousel = carousel.clone();
        Callback::from(move |e: MouseEvent| {
            carousel.dispatch(CarouselAction::PointerDown(e.client_x() as f64))
        })
    };
    let onmousemove = {
        let dragging = carousel.is_dragging();
        Callback::from(move |e: MouseEvent| {
            // Suppress native image/text dragging while swiping.
            if dragging {
                e.prevent_default();
            }
        })
    };
    let onmouseup = {
        let carousel = carousel.clone();
        Callback::from(move |e: MouseEvent| {
            carousel.dispatch(CarouselAction::PointerUp(e.client_x() as f64))
        })
    };
    let onmouseleave = {
        let carousel = carousel.clone();
        Callback::from(move |_: MouseEvent| carousel.dispatch(CarouselAction::PointerCancel))
    };

    html! {
        <section id="inicio" class="hero"
            style={format!("transform: translateY({}px)", parallax_offset(scrolled))}>
            <div class="hero-carousel"
                {ontouchstart} {ontouchend} {onmousedown} {onmousemove} {onmouseup} {onmouseleave}>
                { for slides.iter().enumerate().map(|(position, slide)| {
                    let on_cta = {
                        let on_command = props.on_command.clone();
                        let target = slide.cta_form.clone();
                        Callback::from(move |_: MouseEvent| match FormKind::from_modal_id(&target) {
                            Some(kind) => on_command.emit(SiteCommand::OpenForm(kind)),
                            None => warn!("Slide points at unknown form '{}'", target),
                        })
                    };
                    html! {
                        <div key={position}
                            class={classes!(
                                "hero-slide",
                                slide.theme.clone(),
                                carousel.is_active(position).then_some("active")
                            )}>
                            <div class="hero-content">
                                <h1>{ &slide.title }</h1>
                                <p>{ &slide.subtitle }</p>
                                <button class="btn-primary" onclick={on_cta}>{ &slide.cta_label }</button>
                            </div>
                        </div>
                    }
                }) }
                <button class="carousel-arrow prev" aria-label="Anterior"
                    onclick={dispatch(CarouselAction::Previous)}>{ "‹" }</button>
                <button class="carousel-arrow next" aria-label="Siguiente"
                    onclick={dispatch(CarouselAction::Next)}>{ "›" }</button>
                <div class="carousel-dots">
                    { for (0..carousel.len()).map(|position| html! {
                        <span key={position}
                            class={classes!("dot", carousel.is_active(position).then_some("active"))}
                            onclick={dispatch(CarouselAction::GoTo(position))}></span>
                    }) }
                </div>
            </div>
        </section>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Products

#[derive(Properties, PartialEq)]
pub struct ProductCardProps {
    pub product: Product,
    pub on_select: Callback<String>,
}

#[function_component(ProductCard)]
pub fn product_card(props: &ProductCardProps) -> Html {
    let node = use_node_ref();
    let revealed = use_reveal(node.clone());
    let hovered = use_state(|| false);

    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(true))
    };
    let onmouseleave = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(false))
    };
    let onclick = {
        let title = props.product.title.clone();
        props.on_select.reform(move |_: MouseEvent| title.clone())
    };
    let transform = if *hovered {
        CARD_HOVER_TRANSFORM
    } else {
        CARD_REST_TRANSFORM
    };

    html! {
        <div ref={node}
            class={classes!("product-card", revealed.then_some(REVEAL_CLASS))}
            style={format!("transform: {}", transform)}
            {onmouseenter} {onmouseleave} {onclick}>
            <div class="product-icon">{ &props.product.icon }</div>
            <h3>{ &props.product.title }</h3>
            <p>{ &props.product.summary }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProductGridProps {
    pub content: Rc<SiteContent>,
    pub on_select: Callback<String>,
}

#[function_component(ProductGrid)]
pub fn product_grid(props: &ProductGridProps) -> Html {
    html! {
        <section id="productos" class="products">
            <h2 class="section-title">{ "Nuestros productos" }</h2>
            <div class="product-grid">
                { for props.content.products.iter().map(|product| html! {
                    <ProductCard key={product.title.clone()}
                        product={product.clone()}
                        on_select={props.on_select.clone()} />
                }) }
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProductModalProps {
    pub title: AttrValue,
    pub detail: AttrValue,
    pub on_close: Callback<()>,
    pub on_more: Callback<AttrValue>,
}

#[function_component(ProductModal)]
pub fn product_modal(props: &ProductModalProps) -> Html {
    let more = {
        let title = props.title.clone();
        props.on_more.reform(move |_: MouseEvent| title.clone())
    };
    html! {
        <Overlay class="product-modal" on_dismiss={props.on_close.clone()}>
            <h2>{ props.title.clone() }</h2>
            <p>{ props.detail.clone() }</p>
            <div class="modal-actions">
                <button class="btn-primary" onclick={more}>{ "Más información" }</button>
                <button class="btn-secondary" onclick={props.on_close.reform(|_: MouseEvent| ())}>
                    { "Cerrar" }
                </button>
            </div>
        </Overlay>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Insurance, news and events

#[function_component(InsuranceSection)]
pub fn insurance_section(props: &SectionProps) -> Html {
    html! {
        <section id="seguros" class="insurance">
            <h2 class="section-title">{ "Seguros" }</h2>
            <div class="insurance-grid">
                { for props.content.insurance.iter().map(|line| {
                    let quote = {
                        let tag = line.tag.clone();
                        props.on_command.reform(move |_: MouseEvent| SiteCommand::OpenInsuranceForm(tag.clone()))
                    };
                    html! {
                        <Reveal key={line.tag.clone()} class="insurance-item">
                            <h3>{ &line.label }</h3>
                            <p>{ &line.summary }</p>
                            <button class="btn-secondary" onclick={quote}>{ "Cotizar" }</button>
                        </Reveal>
                    }
                }) }
            </div>
        </section>
    }
}

#[function_component(NewsSection)]
pub fn news_section(props: &SectionProps) -> Html {
    html! {
        <section id="noticias" class="news">
            <h2 class="section-title">{ "Noticias" }</h2>
            <div class="news-grid">
                { for props.content.news.iter().map(|item| {
                    let read = {
                        let tag = item.tag.clone();
                        props.on_command.reform(move |_: MouseEvent| SiteCommand::ShowNews(tag.clone()))
                    };
                    html! {
                        <Reveal key={item.tag.clone()} class="news-item">
                            <h3>{ &item.title }</h3>
                            <p>{ &item.summary }</p>
                            <button class="link-btn" onclick={read}>{ "Leer más" }</button>
                        </Reveal>
                    }
                }) }
            </div>
        </section>
    }
}

#[function_component(EventsSection)]
pub fn events_section(props: &SectionProps) -> Html {
    html! {
        <section id="eventos" class="events">
            <h2 class="section-title">{ "Eventos" }</h2>
            <div class="events-list">
                { for props.content.events.iter().map(|event| {
                    let register = {
                        let tag = event.tag.clone();
                        props.on_command.reform(move |_: MouseEvent| SiteCommand::RegisterEvent(tag.clone()))
                    };
                    html! {
                        <Reveal key={event.tag.clone()} class="event-item">
                            <div class="event-date">{ &event.date }</div>
                            <div class="event-info">
                                <h3>{ &event.name }</h3>
                                <p>{ &event.place }</p>
                            </div>
                            <button class="btn-primary small" onclick={register}>{ "Registrarme" }</button>
                        </Reveal>
                    }
                }) }
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct NewsModalProps {
    pub item: NewsItem,
    pub on_close: Callback<()>,
}

#[function_component(NewsModal)]
pub fn news_modal(props: &NewsModalProps) -> Html {
    html! {
        <Overlay class="news-modal" on_dismiss={props.on_close.clone()}>
            <h2>{ &props.item.title }</h2>
            <p class="news-body">{ &props.item.body }</p>
            <button class="btn-secondary" onclick={props.on_close.reform(|_: MouseEvent| ())}>
                { "Cerrar" }
            </button>
        </Overlay>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Footer with the newsletter form

#[derive(Properties, PartialEq)]
pub struct FooterProps {
    pub on_command: Callback<SiteCommand>,
    pub on_notice: Callback<(NoticeKind, String)>,
}

#[function_component(Footer)]
pub fn footer(props: &FooterProps) -> Html {
    let fields = newsletter_fields();
    let data = use_state(|| empty_data(fields));
    let marks = use_state(BTreeMap::<&'static str, FieldMark>::new);

    let on_field = {
        let data = data.clone();
        Callback::from(move |(name, value): (&'static str, String)| {
            let mut next = (*data).clone();
            next.insert(name.to_string(), value);
            data.set(next);
        })
    };
    let onsubmit = {
        let data = data.clone();
        let marks = marks.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (new_marks, result) = validate(fields, &data);
            match result {
                Ok(()) => {
                    info!("Newsletter subscription accepted");
                    on_notice.emit((
                        NoticeKind::Success,
                        "Formulario enviado correctamente. Nos contactaremos contigo pronto.".to_string(),
                    ));
                    data.set(empty_data(fields));
                    marks.set(BTreeMap::new());
                }
                Err(err) => {
                    on_notice.emit((NoticeKind::Error, err.to_string()));
                    marks.set(new_marks);
                }
            }
        })
    };
    let open_contact = props
        .on_command
        .reform(|_: MouseEvent| SiteCommand::OpenForm(FormKind::Contact));

    html! {
        <footer id="contacto" class="footer">
            <div class="footer-column">
                <h3>{ "Fincomercio" }</h3>
                <p>{ "Línea de atención: (601) 307 8330" }</p>
                <button class="btn-secondary" onclick={open_contact}>{ "Escríbenos" }</button>
            </div>
            <form class="footer-column newsletter-form" novalidate=true {onsubmit}>
                <h3>{ "Recibe nuestras novedades" }</h3>
                { for fields.iter().map(|spec| render_field(
                    field_id(None, spec.name),
                    spec,
                    data.get(spec.name).map(String::as_str).unwrap_or(""),
                    marks.get(spec.name).copied(),
                    spec.required,
                    &on_field,
                )) }
                <button type="submit" class="btn-primary">{ "Suscribirme" }</button>
            </form>
        </footer>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Form modals

#[derive(Properties, PartialEq)]
pub struct FormModalProps {
    pub kind: FormKind,
    pub open: bool,
    /// Insurance type requested by the opener (insurance form only).
    #[prop_or_default]
    pub preset: Option<InsurancePreset>,
    /// Serial of the latest external submit request; 0 when none.
    #[prop_or_default]
    pub submit_request: u64,
    pub on_close: Callback<FormKind>,
    pub on_notice: Callback<(NoticeKind, String)>,
}

#[function_component(FormModal)]
pub fn form_modal(props: &FormModalProps) -> Html {
    let kind = props.kind;
    let fields = kind.fields();
    let data = use_state(|| empty_data(fields));
    let marks = use_state(BTreeMap::<&'static str, FieldMark>::new);

    let on_effect = {
        let data = data.clone();
        let marks = marks.clone();
        let on_close = props.on_close.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |effect: Effect| match effect {
            Effect::ResetFields => {
                data.set(empty_data(fields));
                marks.set(BTreeMap::new());
            }
            Effect::CloseModal(kind) => on_close.emit(kind),
            Effect::Announce(text) => on_notice.emit((NoticeKind::Info, text.to_string())),
            Effect::Schedule { .. } | Effect::CancelTimers => {}
        })
    };
    let submission = use_submission(kind, on_effect);
    let state = submission.state();

    // Closing the modal abandons any running submission.
    {
        let submission = submission.clone();
        use_effect_with(props.open, move |&open| {
            if !open {
                submission.cancel();
            }
            || ()
        });
    }

    {
        let data = data.clone();
        use_effect_with(props.preset.clone(), move |preset| {
            if let Some(preset) = preset {
                let mut next = (*data).clone();
                next.insert("insuranceType".to_string(), preset.insurance_type.clone());
                data.set(next);
            }
            || ()
        });
    }

    let submit = {
        let data = data.clone();
        let marks = marks.clone();
        let submission = submission.clone();
        let on_notice = props.on_notice.clone();
        Callback::from(move |_: ()| {
            let (new_marks, _) = validate(fields, &data);
            marks.set(new_marks);
            match submission.submit(&data) {
                Ok(()) => {}
                Err(SubmitError::InFlight) => debug!("{}: submit ignored, already sending", kind),
                Err(e) => on_notice.emit((NoticeKind::Error, e.to_string())),
            }
        })
    };

    {
        let submit = submit.clone();
        use_effect_with(props.submit_request, move |&serial| {
            if serial > 0 {
                submit.emit(());
            }
            || ()
        });
    }

    let on_field = {
        let data = data.clone();
        Callback::from(move |(name, value): (&'static str, String)| {
            let mut next = (*data).clone();
            next.insert(name.to_string(), value);
            data.set(next);
        })
    };
    let onsubmit = submit.reform(|e: SubmitEvent| e.prevent_default());
    let close = props.on_close.reform(move |_: MouseEvent| kind);
    let backdrop = use_node_ref();
    let on_backdrop = {
        let on_close = props.on_close.clone();
        let backdrop = backdrop.clone();
        Callback::from(move |e: MouseEvent| {
            if backdrop_clicked(&e, &backdrop) {
                on_close.emit(kind);
            }
        })
    };

    let field = |spec: &FieldSpec| {
        render_field(
            field_id(Some(kind), spec.name),
            spec,
            data.get(spec.name).map(String::as_str).unwrap_or(""),
            marks.get(spec.name).copied(),
            is_required(spec, &data),
            &on_field,
        )
    };

    let vehicle_section = (kind == FormKind::Insurance).then(|| {
        let vehicle = VehicleSection::for_insurance_type(
            data.get("insuranceType").map(String::as_str).unwrap_or(""),
        );
        html! {
            <div id="vehicleInfo" class="vehicle-info"
                style={if vehicle.visible { "display: block" } else { "display: none" }}>
                { for fields.iter().filter(|f| VEHICLE_FIELDS.contains(&f.name)).map(field) }
            </div>
        }
    });

    html! {
        <div id={kind.modal_id()}
            ref={backdrop}
            class={classes!("form-modal", props.open.then_some("active"))}
            onclick={on_backdrop}>
            <div class="form-container">
                <button type="button" class="close-btn" aria-label="Cerrar" onclick={close}>{ "×" }</button>
                <h2>{ kind.title() }</h2>
                <form class="modal-form" novalidate=true {onsubmit}>
                    if let Some(message) = state.message() {
                        <div class="form-message success">{ message }</div>
                    }
                    { for fields.iter().filter(|f| !VEHICLE_FIELDS.contains(&f.name)).map(field) }
                    { vehicle_section.unwrap_or_default() }
                    <button type="submit" class="submit-btn" disabled={state.button_disabled()}>
                        { state.button_label() }
                    </button>
                </form>
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Chatbot

#[derive(Properties, PartialEq)]
pub struct ChatbotWidgetProps {
    pub content: Rc<SiteContent>,
    pub on_answer: Callback<String>,
}

#[function_component(ChatbotWidget)]
pub fn chatbot_widget(props: &ChatbotWidgetProps) -> Html {
    let bot = use_state(Chatbot::new);
    let script = &props.content.chatbot;

    let onclick = {
        let bot = bot.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*bot).clone();
            if next.click() {
                bot.set(next);
            }
        })
    };
    let on_minimize = {
        let bot = bot.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            let mut next = (*bot).clone();
            next.toggle_minimized();
            bot.set(next);
        })
    };
    let on_choose = {
        let bot = bot.clone();
        let content = props.content.clone();
        let on_answer = props.on_answer.clone();
        Callback::from(move |tag: String| {
            let mut next = (*bot).clone();
            if let Some(answer) = next.choose(&content, &tag) {
                on_answer.emit(answer.to_string());
            }
            bot.set(next);
        })
    };
    let on_close = {
        let bot = bot.clone();
        Callback::from(move |_: ()| {
            let mut next = (*bot).clone();
            next.close();
            bot.set(next);
        })
    };

    let minimized = bot.is_minimized();
    html! {
        <>
            <div class={classes!("chatbot", bot.widget_flag())}
                style={if minimized { "padding: 0.5rem" } else { "padding: 1rem" }}
                {onclick}>
                <button class="chatbot-minimize" onclick={on_minimize}>{ bot.minimize_label() }</button>
                <div class="chatbot-content"
                    style={if minimized { "display: none" } else { "display: flex" }}>
                    <span class="chatbot-avatar">{ "🤖" }</span>
                    <p>{ &script.prompt }</p>
                </div>
            </div>
            if bot.is_modal_open() {
                <Overlay class="chatbot-modal" on_dismiss={on_close.clone()}>
                    <h3>{ &script.greeting }</h3>
                    <p>{ &script.prompt }</p>
                    <div class="quick-options">
                        { for script.options.iter().map(|option| {
                            let tag = option.tag.clone();
                            html! {
                                <button key={option.tag.clone()}
                                    class="quick-option"
                                    data-option={option.tag.clone()}
                                    onclick={on_choose.reform(move |_: MouseEvent| tag.clone())}>
                                    { &option.label }
                                </button>
                            }
                        }) }
                    </div>
                    <button class="close-modal" onclick={on_close.reform(|_: MouseEvent| ())}>
                        { "Cerrar" }
                    </button>
                </Overlay>
            }
        </>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Dialogs replacing confirm()/prompt()

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
    pub confirmation: Confirmation,
    pub on_accept: Callback<Confirmation>,
    pub on_decline: Callback<()>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let accept = {
        let confirmation = props.confirmation.clone();
        props.on_accept.reform(move |_: MouseEvent| confirmation.clone())
    };
    html! {
        <Overlay class="confirm-dialog" on_dismiss={props.on_decline.clone()}>
            <p>{ &props.confirmation.question }</p>
            <div class="modal-actions">
                <button class="btn-primary" onclick={accept}>{ "Aceptar" }</button>
                <button class="btn-secondary" onclick={props.on_decline.reform(|_: MouseEvent| ())}>
                    { "Cancelar" }
                </button>
            </div>
        </Overlay>
    }
}

#[derive(Properties, PartialEq)]
pub struct SearchDialogProps {
    pub on_search: Callback<String>,
    pub on_close: Callback<()>,
}

#[function_component(SearchDialog)]
pub fn search_dialog(props: &SearchDialogProps) -> Html {
    let term = use_state(String::new);
    let oninput = {
        let term = term.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            term.set(input.value());
        })
    };
    let onsubmit = {
        let term = term.clone();
        let on_search = props.on_search.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_search.emit((*term).clone());
        })
    };
    html! {
        <Overlay class="search-dialog" on_dismiss={props.on_close.clone()}>
            <form {onsubmit}>
                <label for="search-term">{ "¿Qué estás buscando?" }</label>
                <input id="search-term" type="search" value={(*term).clone()} {oninput} />
                <div class="modal-actions">
                    <button type="submit" class="btn-primary">{ "Buscar" }</button>
                    <button type="button" class="btn-secondary"
                        onclick={props.on_close.reform(|_: MouseEvent| ())}>{ "Cancelar" }</button>
                </div>
            </form>
        </Overlay>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Notices replacing alert()

#[derive(Properties, PartialEq)]
pub struct NoticeToastProps {
    pub notice: Notice,
    pub on_dismiss: Callback<u64>,
}

#[function_component(NoticeToast)]
pub fn notice_toast(props: &NoticeToastProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(props.notice.id, move |&id| {
            let expiry = Timeout::new(NOTICE_LIFETIME_MS, move || on_dismiss.emit(id));
            move || drop(expiry)
        });
    }
    let dismiss = {
        let id = props.notice.id;
        props.on_dismiss.reform(move |_: MouseEvent| id)
    };
    html! {
        <div class={classes!("notice", props.notice.kind.class())} role="status">
            <span>{ &props.notice.text }</span>
            <button class="notice-close" aria-label="Cerrar" onclick={dismiss}>{ "×" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeStackProps {
    pub notices: Vec<Notice>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(NoticeStack)]
pub fn notice_stack(props: &NoticeStackProps) -> Html {
    html! {
        <div class="notice-stack" aria-live="polite">
            { for props.notices.iter().map(|notice| html! {
                <NoticeToast key={notice.id}
                    notice={notice.clone()}
                    on_dismiss={props.on_dismiss.clone()} />
            }) }
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Page loader

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoaderPhase {
    Visible,
    Fading,
    Gone,
}

/// Full-page spinner shown until the window has loaded, then faded out and removed.
#[function_component(PageLoader)]
pub fn page_loader() -> Html {
    let phase = use_state(|| LoaderPhase::Visible);
    let timers = use_mut_ref(Vec::<Timeout>::new);

    let start = {
        let phase = phase.clone();
        let timers = timers.clone();
        Callback::from(move |_: ()| {
            if !timers.borrow().is_empty() {
                return;
            }
            let fade = {
                let phase = phase.clone();
                Timeout::new(LOADER_HOLD_MS, move || phase.set(LoaderPhase::Fading))
            };
            let remove = {
                let phase = phase.clone();
                Timeout::new(LOADER_HOLD_MS + LOADER_FADE_MS, move || {
                    phase.set(LoaderPhase::Gone)
                })
            };
            timers.borrow_mut().extend([fade, remove]);
        })
    };

    use_event_listener(ListenOn::Window, "load", start.reform(|_: Event| ()));
    {
        let start = start.clone();
        use_effect_with((), move |_| {
            // Mounted after the load event already fired.
            if document_loaded() {
                start.emit(());
            }
            || ()
        });
    }

    match *phase {
        LoaderPhase::Gone => html! {},
        phase => {
            let fading = phase == LoaderPhase::Fading;
            html! {
                <div id="page-loader"
                    class={classes!("page-loader", fading.then_some("fading"))}
                    style={format!(
                        "opacity: {}; transition: opacity {}ms ease",
                        if fading { 0 } else { 1 },
                        LOADER_FADE_MS
                    )}>
                    <div class="loader-spinner"></div>
                    <p>{ "Cargando..." }</p>
                </div>
            }
        }
    }
}
