//! Static page text. Everything here is trusted markup and is inserted
//! into the page without escaping.

use super::ChartKind;

pub const PAGE_TITLE: &str = "Canadian Gas Prices 🍁.....through the Years";

pub const INTRO: &str = concat!(
    "<p>This application is a dashboard that can be used to explore historical trends in Canadian gas",
    " prices. There are a few plot types highlighted that can be used to find various unique insigts ",
    "for each city and province through the years. All data was retrieved from ",
    "<a href=\"https://www.statcan.gc.ca/en/subjects-start/population_and_demography\">Stats Canada</a>.",
    " In this analysis, I go through the pros and cons of each chart type highlighting each plot type's strengths",
    "and weaknesses. Each chart has been created using the ",
    "<a href=\"https://plotly.com/python-api-reference/\">Plotly API</a>.  Plotly allows the user to create dynamic interactive",
    " plots which can be used to gain deeper insights (I was not paid to say that and I have no affiliation with plotly at all...).  I especially liked using ",
    " their API because of their animation feature. It proves to be very handy when exploring time series data.",
    " Below each chart you can view the data used to create it.</p>\n",
    "<p><em>All monetary values are in CAD and have been adjusted to their present day dollar value (real dollars)</em></p>",
);

/// Notes printed under a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commentary {
    pub details: &'static str,
    pub pros: &'static str,
    pub cons: &'static str,
    pub insights: &'static str,
    pub questions: [&'static str; 3],
}

impl Commentary {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (label, text) in [
            ("Data Details", self.details),
            ("Pros", self.pros),
            ("Cons", self.cons),
            ("Insights", self.insights),
        ] {
            out.push_str(&format!("<p><strong>{label}:</strong> {text}</p>\n"));
        }
        out.push_str("<ul>\n");
        for q in self.questions {
            out.push_str(&format!("<li>{q}</li>\n"));
        }
        out.push_str("</ul>\n");
        out
    }
}

static LINECHART: Commentary = Commentary {
    details: "The data has been aggregated by city, and each province (except Nunavut) has atleast one city represented in the data.  Data is presented in wide format inorder to provide the index as a trace for each line.",
    pros: "Useful for representing and gaining intuition on continuous data, especially as change over timeEstimates can be made as to the direction that the data is heading. Comparisons can be made between items to glean insights on relationships.",
    cons: "Alot is going on... too many lines, that have values that are too similar, can make comparing data difficult ",
    insights: "Generally, all cities seem to follow a similar trend. There are a few obvious dips in price, perhaps the most apparent can be explained by the 2008 Financial Crisisand the recent COVID-19 pandemic. Generally, prices have showed an increasing trend over the past few decades.Main questions I  would ask looking at the data from this perspective are: ",
    questions: [
        "What are the seasonal trends for increases and decreases in price?",
        "Is there a time of year when it is ideal to do more driving?",
        "How far into the future and with what accuracy can we predict the price of gas?",
    ],
};

static CHOROPLETH: Commentary = Commentary {
    details: "The data has been aggregated by the yearly mean for each province. Unfortunately, therewas no data available for Nunavut. Rather than just leaving it at zero and skewing the colorbar's range, I decided to drop it altogether from the map.... sorry Nunavut",
    pros: "Visually effective - can see a large amount of information and general patterns ",
    cons: "Since the choropleth map uses the mean price to represent defined provinces and territories, the viewer can not gain detailed information or perspective on any of the area's internal conditions.Also, the gradient between colours is not distict enough to be ableto adequately distingish differences in magnitude. ",
    insights: "The Yukon and Northwest Territories seem to constantly experience a greater relative to the other provinces. I would presume that generally, prices in the territories reach higher levels because of the transportation costs involved This perspecitve of the data raises questions about what effects geography play on price.",
    questions: [
        "How strongly does a city's longitude or latidue correlate with it's fuel price?",
        "Does the distance between a city and an oil refinery play a roll in how much people in the city will pay?",
        "Does the number of refineries in a province play a roll in the amount people in the province pay?",
    ],
};

static SCATTERPLOT: Commentary = Commentary {
    details: "The data has been subsected by the yearly mean for each city. City population data for each year was also added from <a href=\"https://www.statcan.gc.ca/en/subjects-start/population_and_demography\">Stats Canada</a>. From the popluation, I also created a new data point 'Estimated number of Vehicles' which is simpy half the population size.",
    pros: "They can show large quantities of data and make it easy to see correlations between variables and clustering effects.As a quick overview and analytical tool, scatterplots are invaluable and work with almost any continuous scale data.It's quite simple to distinguish differences between maxima and minima.",
    cons: "It can be confusing to track all the variables being dsiplayed and it's easy to get lost in what is going on with each marker. Also, the differences population magnitudes are quite apparent in the data. To account, for the large variances in scale, a log axis was used.  ",
    insights: "The addition of city population metric initally made me ask questions about price differences between  cities within a province.",
    questions: [
        "How does the price of gas deviate in large cities comapred to smaller ones?",
        "If the deviation is large enough, will I save more money fueling up at a small town just outside the city?",
        "With increaseing options of non-fuel based transportation alternatives, how much will the price deviate?",
    ],
};

pub fn commentary(kind: ChartKind) -> &'static Commentary {
    match kind {
        ChartKind::Linechart => &LINECHART,
        ChartKind::Choropleth => &CHOROPLETH,
        ChartKind::Scatterplot => &SCATTERPLOT,
    }
}

pub const CONTACTS_HEADER: &str = "Contacts";

pub const CONTACTS: &str = concat!(
    "<p><a href=\"mailto:e.pogrebnyak@gmail.com\"><img alt=\"MAIL Badge\" ",
    "src=\"https://img.shields.io/badge/-jrkagumba@gmail.com-c14438?style=flat-square&amp;logo=Gmail&amp;logoColor=white&amp;link=mailto:e.pogrebnyak@gmail.com\"></a></p>\n",
    "<p>Thanks for exploring this dataset with me!\n",
    "If you happen to have a good idea or comment about the dataset, please send me a message.\n",
    "I appreciate the feedback and look forward to hearing about any other data \n",
    "use-cases, project development stories and any future applications of this dataset. </p>\n",
    "<p>(C) Joe Kagumba, 2022</p>",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chart_has_three_questions() {
        for kind in ChartKind::ALL {
            let html = commentary(kind).to_html();
            assert_eq!(html.matches("<li>").count(), 3);
            let details = html.find("<strong>Data Details:</strong>");
            let insights = html.find("<strong>Insights:</strong>");
            assert!(details.is_some() && details < insights);
        }
    }

    #[test]
    fn choropleth_notes_nunavut() {
        assert!(commentary(ChartKind::Choropleth).details.contains("sorry Nunavut"));
        assert!(CONTACTS.ends_with("(C) Joe Kagumba, 2022</p>"));
    }
}
