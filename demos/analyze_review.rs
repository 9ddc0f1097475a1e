use sentimiento::error::Result;
use sentimiento::sentiment::SentimentAnalyzerBuilder;

fn main() -> Result<()> {
    println!("Building analyzer...");

    let analyzer = SentimentAnalyzerBuilder::robertuito().build();

    // The model loads here, on first use.
    let analyzer_model = analyzer.warm_up()?;
    println!("Model ready with labels {:?}.", analyzer_model.labels());

    let text = "¡Me encantó el restaurante! La comida estaba deliciosa 😍";
    let result = analyzer.analyze_review_sentiment(text)?;

    println!("\n=== Sentiment Analysis Result ===");
    println!("Text: \"{}\"", result.review_data.text_original);
    println!("Processed: \"{}\"", result.review_data.text_processed);
    println!(
        "Sentiment: {} ({})",
        result.sentiment_analysis.label, result.summary.puntuacion_estrellas
    );
    let probs = &result.sentiment_analysis.probabilities;
    println!(
        "Probabilities: POS {:.2}% | NEG {:.2}% | NEU {:.2}%",
        probs.positive, probs.negative, probs.neutral
    );

    println!("\n=== More reviews ===");
    let reviews = [
        "El envío tardó tres semanas y llegó roto. Pésimo @tienda_online",
        "Está bien, nada especial.",
        "jajajaja qué buen servicio #MuyRecomendable",
    ];

    for review in reviews {
        let r = analyzer.analyze_review_sentiment(review)?;
        println!(
            "{} → {} ({})",
            review, r.sentiment_analysis.label, r.summary.puntuacion_estrellas
        );
    }

    println!(
        "\n{}",
        serde_json::to_string_pretty(&result).unwrap_or_default()
    );

    Ok(())
}
