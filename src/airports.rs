// Static airport dataset used for search-box suggestions. Input collaborator
// only; the provider is the authority on which codes it actually serves.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Airport {
    pub iata: &'static str,
    pub name: &'static str,
    pub city: &'static str,
}

const MAX_SUGGESTIONS: usize = 20;

pub const AIRPORTS: &[Airport] = &[
    // Major Indian airports
    Airport { iata: "DEL", name: "Indira Gandhi International Airport", city: "Delhi" },
    Airport { iata: "BOM", name: "Chhatrapati Shivaji Maharaj International Airport", city: "Mumbai" },
    Airport { iata: "BLR", name: "Kempegowda International Airport", city: "Bengaluru" },
    Airport { iata: "MAA", name: "Chennai International Airport", city: "Chennai" },
    Airport { iata: "HYD", name: "Rajiv Gandhi International Airport", city: "Hyderabad" },
    Airport { iata: "CCU", name: "Netaji Subhas Chandra Bose International Airport", city: "Kolkata" },
    Airport { iata: "AMD", name: "Sardar Vallabhbhai Patel International Airport", city: "Ahmedabad" },
    Airport { iata: "PNQ", name: "Pune Airport", city: "Pune" },
    Airport { iata: "GOI", name: "Goa International Airport (Dabolim)", city: "Goa" },
    Airport { iata: "COK", name: "Cochin International Airport", city: "Kochi" },
    Airport { iata: "JAI", name: "Jaipur International Airport", city: "Jaipur" },
    Airport { iata: "LKO", name: "Chaudhary Charan Singh International Airport", city: "Lucknow" },
    Airport { iata: "GAU", name: "Lokpriya Gopinath Bordoloi International Airport", city: "Guwahati" },
    Airport { iata: "TRV", name: "Trivandrum International Airport", city: "Thiruvananthapuram" },
    Airport { iata: "BBI", name: "Biju Patnaik International Airport", city: "Bhubaneswar" },
    // Regional Indian airports
    Airport { iata: "IXC", name: "Chandigarh International Airport", city: "Chandigarh" },
    Airport { iata: "PAT", name: "Jay Prakash Narayan International Airport", city: "Patna" },
    Airport { iata: "IXR", name: "Birsa Munda Airport", city: "Ranchi" },
    Airport { iata: "SXR", name: "Sheikh ul-Alam International Airport", city: "Srinagar" },
    Airport { iata: "IXB", name: "Bagdogra Airport", city: "Siliguri" },
    Airport { iata: "VNS", name: "Lal Bahadur Shastri International Airport", city: "Varanasi" },
    Airport { iata: "IXJ", name: "Jammu Airport", city: "Jammu" },
    Airport { iata: "IXL", name: "Kushok Bakula Rimpochee Airport", city: "Leh" },
    Airport { iata: "ATQ", name: "Sri Guru Ram Dass Jee International Airport", city: "Amritsar" },
    Airport { iata: "DIU", name: "Diu Airport", city: "Diu" },
    Airport { iata: "IXZ", name: "Veer Savarkar International Airport", city: "Port Blair" },
    Airport { iata: "IDR", name: "Devi Ahilya Bai Holkar Airport", city: "Indore" },
    Airport { iata: "UDR", name: "Maharana Pratap Airport", city: "Udaipur" },
    Airport { iata: "JDH", name: "Jodhpur Airport", city: "Jodhpur" },
    Airport { iata: "IXA", name: "Maharaja Bir Bikram Airport", city: "Agartala" },
    Airport { iata: "IMF", name: "Imphal International Airport", city: "Imphal" },
    Airport { iata: "RPR", name: "Swami Vivekananda Airport", city: "Raipur" },
    Airport { iata: "NAG", name: "Dr. Babasaheb Ambedkar International Airport", city: "Nagpur" },
    Airport { iata: "VGA", name: "Vijayawada Airport", city: "Vijayawada" },
    Airport { iata: "IXM", name: "Madurai Airport", city: "Madurai" },
    Airport { iata: "CJB", name: "Coimbatore International Airport", city: "Coimbatore" },
    Airport { iata: "IXE", name: "Mangalore International Airport", city: "Mangalore" },
    Airport { iata: "TRZ", name: "Tiruchirappalli International Airport", city: "Tiruchirappalli" },
    Airport { iata: "GAY", name: "Gaya Airport", city: "Gaya" },
    Airport { iata: "DED", name: "Dehradun Airport", city: "Dehradun" },
    Airport { iata: "IXD", name: "Allahabad Airport", city: "Prayagraj" },
    Airport { iata: "VTZ", name: "Visakhapatnam International Airport", city: "Visakhapatnam" },
    Airport { iata: "BDQ", name: "Vadodara Airport", city: "Vadodara" },
    Airport { iata: "IXS", name: "Silchar Airport", city: "Silchar" },
    Airport { iata: "IXU", name: "Aurangabad Airport", city: "Aurangabad" },
    Airport { iata: "BHO", name: "Raja Bhoj Airport", city: "Bhopal" },
    Airport { iata: "GOP", name: "Gorakhpur Airport", city: "Gorakhpur" },
    Airport { iata: "IXY", name: "Kandla Airport", city: "Gandhidham" },
    Airport { iata: "JRH", name: "Jorhat Airport", city: "Jorhat" },
    Airport { iata: "IXI", name: "North Lakhimpur Airport", city: "Lilabari" },
    Airport { iata: "IXW", name: "Jamshedpur Airport", city: "Jamshedpur" },
    Airport { iata: "KLH", name: "Kolhapur Airport", city: "Kolhapur" },
    Airport { iata: "KQH", name: "Kishangarh Airport", city: "Ajmer" },
    Airport { iata: "IXG", name: "Belgaum Airport", city: "Belgaum" },
    Airport { iata: "HBX", name: "Hubli Airport", city: "Hubli" },
    Airport { iata: "MYQ", name: "Mysore Airport", city: "Mysore" },
    Airport { iata: "RJA", name: "Rajahmundry Airport", city: "Rajahmundry" },
    Airport { iata: "IXP", name: "Pathankot Airport", city: "Pathankot" },
    Airport { iata: "PUT", name: "Sri Sathya Sai Airport", city: "Puttaparthi" },
    Airport { iata: "RAJ", name: "Rajkot Airport", city: "Rajkot" },
    Airport { iata: "STV", name: "Surat Airport", city: "Surat" },
    Airport { iata: "TEZ", name: "Tezpur Airport", city: "Tezpur" },
    Airport { iata: "TIR", name: "Tirupati Airport", city: "Tirupati" },
    Airport { iata: "TCR", name: "Tuticorin Airport", city: "Tuticorin" },
    Airport { iata: "VDY", name: "Vidyanagar Airport", city: "Vidyanagar" },
    Airport { iata: "IXH", name: "Kailashahar Airport", city: "Kailashahar" },
    Airport { iata: "IXK", name: "Keshod Airport", city: "Keshod" },
    Airport { iata: "IXQ", name: "Kamalpur Airport", city: "Kamalpur" },
    Airport { iata: "IXV", name: "Along Airport", city: "Along" },
    Airport { iata: "RGH", name: "Balurghat Airport", city: "Balurghat" },
    Airport { iata: "CNN", name: "Kannur International Airport", city: "Kannur" },
    Airport { iata: "SAG", name: "Shirdi Airport", city: "Shirdi" },
    Airport { iata: "NMB", name: "Daman Airport", city: "Daman" },
    Airport { iata: "DHM", name: "Kangra Airport", city: "Dharamshala" },
    Airport { iata: "BHJ", name: "Bhuj Airport", city: "Bhuj" },
    Airport { iata: "PGH", name: "Pantnagar Airport", city: "Pantnagar" },
    Airport { iata: "DIB", name: "Dibrugarh Airport", city: "Dibrugarh" },
    Airport { iata: "DMU", name: "Dimapur Airport", city: "Dimapur" },
    Airport { iata: "AGX", name: "Agatti Airport", city: "Agatti Island" },
    Airport { iata: "PYB", name: "Jeypore Airport", city: "Jeypore" },
    Airport { iata: "PYG", name: "Pakyong Airport", city: "Gangtok" },
    Airport { iata: "ZER", name: "Zero Airport", city: "Zero" },
    // Major international airports
    Airport { iata: "JFK", name: "John F. Kennedy International Airport", city: "New York" },
    Airport { iata: "LHR", name: "Heathrow Airport", city: "London" },
    Airport { iata: "CDG", name: "Charles de Gaulle Airport", city: "Paris" },
    Airport { iata: "DXB", name: "Dubai International Airport", city: "Dubai" },
    Airport { iata: "SIN", name: "Changi Airport", city: "Singapore" },
    Airport { iata: "HKG", name: "Hong Kong International Airport", city: "Hong Kong" },
    Airport { iata: "FRA", name: "Frankfurt Airport", city: "Frankfurt" },
    Airport { iata: "AMS", name: "Amsterdam Airport Schiphol", city: "Amsterdam" },
    Airport { iata: "SYD", name: "Sydney Airport", city: "Sydney" },
    Airport { iata: "LAX", name: "Los Angeles International Airport", city: "Los Angeles" },
    Airport { iata: "ORD", name: "O'Hare International Airport", city: "Chicago" },
    Airport { iata: "BKK", name: "Suvarnabhumi Airport", city: "Bangkok" },
    Airport { iata: "ICN", name: "Incheon International Airport", city: "Seoul" },
    Airport { iata: "MEL", name: "Melbourne Airport", city: "Melbourne" },
    Airport { iata: "BCN", name: "Josep Tarradellas Barcelona-El Prat Airport", city: "Barcelona" },
    Airport { iata: "MAD", name: "Adolfo Suárez Madrid-Barajas Airport", city: "Madrid" },
    Airport { iata: "FCO", name: "Leonardo da Vinci International Airport", city: "Rome" },
    Airport { iata: "MUC", name: "Munich Airport", city: "Munich" },
    Airport { iata: "ZRH", name: "Zurich Airport", city: "Zurich" },
    Airport { iata: "IST", name: "Istanbul Airport", city: "Istanbul" },
    Airport { iata: "KUL", name: "Kuala Lumpur International Airport", city: "Kuala Lumpur" },
    Airport { iata: "YYZ", name: "Toronto Pearson International Airport", city: "Toronto" },
    Airport { iata: "GRU", name: "São Paulo/Guarulhos International Airport", city: "São Paulo" },
    Airport { iata: "JNB", name: "O. R. Tambo International Airport", city: "Johannesburg" },
    Airport { iata: "NRT", name: "Narita International Airport", city: "Tokyo" },
    Airport { iata: "HND", name: "Haneda Airport", city: "Tokyo" },
    Airport { iata: "PEK", name: "Beijing Capital International Airport", city: "Beijing" },
    Airport { iata: "PVG", name: "Shanghai Pudong International Airport", city: "Shanghai" },
];

/// Case-insensitive substring match over IATA code, airport name and city.
/// Returns at most 20 entries in dataset order; an empty query returns
/// nothing rather than everything.
pub fn suggest(query: &str) -> Vec<&'static Airport> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    AIRPORTS
        .iter()
        .filter(|airport| {
            airport.iata.to_lowercase().contains(&needle)
                || airport.name.to_lowercase().contains(&needle)
                || airport.city.to_lowercase().contains(&needle)
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_nothing() {
        assert!(suggest("").is_empty());
    }

    #[test]
    fn test_matches_iata_code_case_insensitively() {
        let results = suggest("del");
        assert!(results.iter().any(|a| a.iata == "DEL"));
    }

    #[test]
    fn test_matches_city_and_name() {
        let by_city = suggest("Mumbai");
        assert!(by_city.iter().any(|a| a.iata == "BOM"));

        let by_name = suggest("heathrow");
        assert!(by_name.iter().any(|a| a.iata == "LHR"));
    }

    #[test]
    fn test_result_count_is_capped() {
        // Single letters match many airports
        assert!(suggest("a").len() <= MAX_SUGGESTIONS);
        assert_eq!(suggest("a").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_unknown_query_returns_empty() {
        assert!(suggest("zzzzzz").is_empty());
    }
}
