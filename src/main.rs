//! Fincomercio site front end using Yew.
//! Wires the page sections, overlays and global command bridge to the shared state.

use fincomercio_web::bridge::{self, SiteCommand};
use fincomercio_web::content::SiteContent;
use fincomercio_web::forms::FormKind;
use fincomercio_web::notice::{
    product_redirect_notice, search_notice, Confirmation, NoticeAction, NoticeBoard, NoticeKind,
};
use fincomercio_web::site::{SiteAction, SiteState};
use log::{debug, error, info};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod utils;

use components::{
    ChatbotWidget, ConfirmDialog, EventsSection, Footer, FormModal, Header, Hero,
    InsuranceSection, NewsModal, NewsSection, NoticeStack, PageLoader, ProductGrid, ProductModal,
    SearchDialog,
};
use config::LOG_LEVEL;
use hooks::{use_event_listener, ListenOn};

#[derive(Properties, PartialEq)]
struct SiteProps {
    content: Rc<SiteContent>,
}

/// Composition root: owns overlay state and notices, and serves the global command bridge.
#[function_component(Site)]
fn site(props: &SiteProps) -> Html {
    let state = use_reducer({
        let content = props.content.clone();
        move || SiteState::new(content)
    });
    let notices = use_reducer(NoticeBoard::default);
    let content = state.content().clone();

    let on_command = {
        let state = state.clone();
        Callback::from(move |command: SiteCommand| {
            debug!("Command {:?}", command);
            state.dispatch(SiteAction::Command(command));
        })
    };
    let action = |action: SiteAction| {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(action.clone()))
    };
    let notify = {
        let notices = notices.clone();
        Callback::from(move |(kind, text): (NoticeKind, String)| {
            notices.dispatch(NoticeAction::Push(kind, text))
        })
    };

    // Page-level functions called from markup outside the component tree.
    {
        let on_command = on_command.clone();
        use_effect_with((), move |_| {
            let registration = bridge::register(on_command);
            move || drop(registration)
        });
    }

    use_effect_with(state.body_scroll_locked(), |&locked| {
        utils::set_body_scroll_locked(locked);
        || ()
    });

    {
        let state = state.clone();
        use_event_listener(
            ListenOn::Document,
            "keydown",
            Callback::from(move |e: Event| {
                if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                    if key.key() == "Escape" {
                        state.dispatch(SiteAction::CloseActiveForm);
                    }
                }
            }),
        );
    }

    let on_select_product = {
        let state = state.clone();
        Callback::from(move |title: String| state.dispatch(SiteAction::OpenProduct(title)))
    };
    let on_more = {
        let state = state.clone();
        let notify = notify.clone();
        Callback::from(move |title: AttrValue| {
            notify.emit((NoticeKind::Info, product_redirect_notice(&title)));
            state.dispatch(SiteAction::CloseProduct);
        })
    };
    let on_accept = {
        let state = state.clone();
        let notify = notify.clone();
        Callback::from(move |confirmation: Confirmation| {
            info!("Confirmed: {}", confirmation.question);
            notify.emit((NoticeKind::Success, confirmation.accepted_notice()));
            state.dispatch(SiteAction::CloseConfirmation);
        })
    };
    let on_search = {
        let state = state.clone();
        let notify = notify.clone();
        Callback::from(move |term: String| {
            if let Some(text) = search_notice(&term) {
                notify.emit((NoticeKind::Info, text));
            }
            state.dispatch(SiteAction::CloseSearch);
        })
    };
    let close_form = on_command.reform(SiteCommand::CloseForm);
    let on_dismiss_notice = {
        let notices = notices.clone();
        Callback::from(move |id: u64| notices.dispatch(NoticeAction::Dismiss(id)))
    };

    html! {
        <>
            <PageLoader />
            <Header on_command={on_command.clone()} on_search={action(SiteAction::OpenSearch)} />
            <main>
                <Hero content={content.clone()} on_command={on_command.clone()} />
                <ProductGrid content={content.clone()} on_select={on_select_product} />
                <InsuranceSection content={content.clone()} on_command={on_command.clone()} />
                <NewsSection content={content.clone()} on_command={on_command.clone()} />
                <EventsSection content={content.clone()} on_command={on_command.clone()} />
            </main>
            <Footer on_command={on_command.clone()} on_notice={notify.clone()} />

            { for FormKind::ALL.iter().map(|&kind| html! {
                <FormModal key={kind.modal_id()}
                    {kind}
                    open={state.is_form_open(kind)}
                    preset={if kind == FormKind::Insurance { state.insurance_preset().cloned() } else { None }}
                    submit_request={state.submit_request(kind)}
                    on_close={close_form.clone()}
                    on_notice={notify.clone()} />
            }) }

            if let Some(title) = state.product() {
                <ProductModal
                    title={title.to_string()}
                    detail={content.card_detail.clone()}
                    on_close={action(SiteAction::CloseProduct)}
                    {on_more} />
            }
            if let Some(item) = state.news_item() {
                <NewsModal item={item.clone()} on_close={action(SiteAction::CloseNews)} />
            }
            if let Some(confirmation) = state.confirmation() {
                <ConfirmDialog
                    confirmation={confirmation.clone()}
                    {on_accept}
                    on_decline={action(SiteAction::CloseConfirmation)} />
            }
            if state.is_search_open() {
                <SearchDialog {on_search} on_close={action(SiteAction::CloseSearch)} />
            }

            <ChatbotWidget
                content={content.clone()}
                on_answer={notify.reform(|text: String| (NoticeKind::Info, text))} />
            <NoticeStack notices={notices.notices().to_vec()} on_dismiss={on_dismiss_notice} />
        </>
    }
}

/// Loads the embedded catalog and mounts the site, or an error panel if it is unusable.
#[function_component]
pub fn App() -> Html {
    let content = use_memo((), |_| {
        SiteContent::embedded()
            .map(Rc::new)
            .map_err(|e| e.to_string())
    });
    match &*content {
        Ok(content) => html! { <Site content={content.clone()} /> },
        Err(message) => {
            error!("Site content unavailable: {}", message);
            html! {
                <div class="content-error">
                    <p>{ "No pudimos cargar el contenido del sitio. Intenta de nuevo más tarde." }</p>
                </div>
            }
        }
    }
}

/// Entry point: logging, global error handlers, then the Yew renderer.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(LOG_LEVEL));
    utils::install_error_handlers();
    utils::install_performance_monitor();
    yew::Renderer::<App>::new().render();
    info!("Fincomercio site loaded");
}
