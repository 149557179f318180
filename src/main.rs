use nickdl::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = NickBuilder::new().build()?;

    let region = Region {
        name: "English".to_string(),
        lang: "en".to_string(),
        locale: "en-gb".to_string(),
        family: CatalogFamily::Intl,
    };

    let series = client.list_series(&region).await?;
    println!("{} series in {region}", series.len());

    let Some(first) = series.iter().find(|s| s.episodes.is_some()) else {
        return Ok(());
    };

    let episodes = client.list_episodes(first).await?;
    println!("{first}: {} episodes", episodes.len());

    if let Some(episode) = episodes.first() {
        let items = client.media_items(first, episode).await?;
        for item in &items {
            println!("  {} -> {}", item.title, item.mediagen.url);
        }
    }

    Ok(())
}
