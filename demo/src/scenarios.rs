//! Scripted walkthroughs
use anyhow::{ensure, Context};
use std::cell::Cell;
use std::rc::Rc;
use waypoint_core::{NavigationAction, NavigationDestination};

use crate::destinations::{
    ExampleDestinations, HomeDestinations, PopoverDestinations, RootTabs, SettingsDestinations,
    UnregisteredDestinations, HOME_CHECKPOINT,
};
use crate::renderer::LogRenderer;
use crate::state::AppState;

type Scenario = fn(&mut AppState, &mut LogRenderer) -> anyhow::Result<()>;

pub fn run_all(state: &mut AppState, renderer: &mut LogRenderer) -> anyhow::Result<()> {
    let scenarios: [(&str, Scenario); 6] = [
        ("deep link", deep_link),
        ("paused sequence", paused_sequence),
        ("send from modal", send_from_modal),
        ("checkpoint callback", checkpoint_callback),
        ("popovers", popovers),
        ("unregistered destination", unregistered),
    ];

    for (name, scenario) in scenarios {
        tracing::info!(scenario = name, "Running scenario");
        scenario(state, renderer).with_context(|| format!("scenario {name}"))?;
        renderer.pump();
    }
    Ok(())
}

fn path_of<D: NavigationDestination>(state: &AppState, tab: RootTabs) -> Vec<D> {
    state
        .tab(tab)
        .path()
        .iter()
        .filter_map(|d| d.downcast_ref::<D>().cloned())
        .collect()
}

fn deep_link(state: &mut AppState, renderer: &mut LogRenderer) -> anyhow::Result<()> {
    state.router().open("waypoint://home/page/88", state.navigator())?;
    renderer.pump();

    ensure!(state.navigator().selected_tab() == Some(RootTabs::Home.scene_id()));
    ensure!(path_of::<HomeDestinations>(state, RootTabs::Home) == vec![HomeDestinations::PageN(88)]);
    Ok(())
}

/// The loading sheet pauses the queue; the renderer resumes it once loaded
fn paused_sequence(state: &mut AppState, renderer: &mut LogRenderer) -> anyhow::Result<()> {
    state.router().open("waypoint://settings/loading", state.navigator())?;
    ensure!(state.navigator().pending_actions() > 0, "loading screen should pause the sequence");
    renderer.pump();

    let settings = state.tab(RootTabs::Settings);
    ensure!(settings.presented().is_none());
    ensure!(path_of::<SettingsDestinations>(state, RootTabs::Settings) == vec![SettingsDestinations::Page3]);
    Ok(())
}

fn send_from_modal(state: &mut AppState, renderer: &mut LogRenderer) -> anyhow::Result<()> {
    let settings = state.tab(RootTabs::Settings);
    let modal = settings
        .present_sheet(SettingsDestinations::Sheet)
        .context("presenting settings sheet")?;
    renderer.pump();

    modal.send([
        NavigationAction::DismissAny,
        NavigationAction::switch_to(RootTabs::Home.scene_id()),
        NavigationAction::pop_all(RootTabs::Home.scene_id()),
        NavigationAction::push(HomeDestinations::Page2),
        NavigationAction::push(HomeDestinations::PageN(88)),
        NavigationAction::from(HomeDestinations::Presented1),
    ]);
    renderer.pump();

    let home = state.tab(RootTabs::Home);
    ensure!(!modal.is_alive());
    ensure!(
        path_of::<HomeDestinations>(state, RootTabs::Home)
            == vec![HomeDestinations::Page2, HomeDestinations::PageN(88)]
    );
    ensure!(home.presented().is_some());

    home.dismiss_presented_views();
    Ok(())
}

fn checkpoint_callback(state: &mut AppState, renderer: &mut LogRenderer) -> anyhow::Result<()> {
    let home = state.tab(RootTabs::Home);
    let received = Rc::new(Cell::new(None));
    let sink = Rc::clone(&received);
    let registration = home
        .establish_checkpoint_with(HOME_CHECKPOINT, move |value: &i32| {
            tracing::info!(value, "Home checkpoint received value");
            sink.set(Some(*value));
        })
        .context("establishing home checkpoint")?;

    let sheet = home
        .present(HomeDestinations::Presented1, HomeDestinations::Presented1.method())
        .context("presenting managed sheet")?;
    sheet.push(HomeDestinations::PageN(1));
    sheet.push(HomeDestinations::PageN(2));
    renderer.pump();

    let outcome = sheet.return_to_checkpoint_with(&HOME_CHECKPOINT, 42_i32);
    ensure!(outcome.is_found());
    ensure!(received.get() == Some(42));
    ensure!(!sheet.is_alive());

    home.remove_checkpoint(&registration);
    Ok(())
}

fn popovers(state: &mut AppState, renderer: &mut LogRenderer) -> anyhow::Result<()> {
    let examples = state.tab(RootTabs::Examples);
    tracing::info!(description = ExampleDestinations::Popover.description(), "Popover example");

    let cover = examples
        .present(ExampleDestinations::Popover, ExampleDestinations::Popover.method())
        .context("presenting popover example")?;
    renderer.pump();

    ensure!(cover.navigate(PopoverDestinations::FilterOptions));
    let filter_presenting = state.anchor("filter").is_some_and(|a| a.binding.is_presenting());
    let help_presenting = state.anchor("help").is_some_and(|a| a.binding.is_presenting());
    ensure!(filter_presenting && !help_presenting);
    cover.dismiss_presented_views();

    // With the help anchor gone, auto-detect falls back to the filter anchor
    ensure!(state.remove_anchor("help"), "help anchor was registered");
    ensure!(state.navigator().popover_registry().lookup("help").is_none());
    ensure!(cover.navigate(PopoverDestinations::AutoDetect));
    ensure!(cover.popover().and_then(|p| p.source_id).as_deref() == Some("filter"));
    cover.dismiss_presented_views();
    renderer.pump();

    ensure!(!cover.navigate(PopoverDestinations::Help), "help anchor was removed");
    cover.dismiss();
    Ok(())
}

fn unregistered(state: &mut AppState, _renderer: &mut LogRenderer) -> anyhow::Result<()> {
    let settings = state.tab(RootTabs::Settings);
    let before = settings.path().len();
    ensure!(!settings.push(UnregisteredDestinations::Page1));
    ensure!(settings.path().len() == before);
    Ok(())
}
